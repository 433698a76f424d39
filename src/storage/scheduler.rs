//! Expiration Scheduler
//!
//! A single background task that owns every pending expiration. Stores send it
//! `Schedule` / `Cancel` commands; when a deadline passes it asks the store to
//! remove the key, but only if the entry still carries the version captured
//! when the expiration was scheduled.

use std::collections::HashMap;
use std::future::poll_fn;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::time::delay_queue::{self, DelayQueue};
use tracing::{debug, info};

// == Commands ==
#[derive(Debug)]
enum Command {
    Schedule {
        key: String,
        version: u64,
        deadline: Instant,
    },
    Cancel {
        key: String,
    },
    CancelAll,
}

// == Expiry Task ==
/// What fires when a deadline passes.
#[derive(Debug)]
struct ExpiryTask {
    key: String,
    version: u64,
    /// Real deadline; the queue may hold the task until an earlier hop.
    deadline: Instant,
}

/// A scheduled task as tracked by the scheduler; the delay-queue key doubles
/// as its cancellation token.
#[derive(Debug)]
struct Pending {
    version: u64,
    token: delay_queue::Key,
}

/// Longest delay handed to the delay queue in one go. Later deadlines are
/// reached in hops of at most this length.
const MAX_HOP: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// How far past its last firing the delay queue's timer wheel can address
/// (2^36 ms, about 795 days), less a margin.
const WHEEL_SPAN: Duration = Duration::from_secs(730 * 24 * 60 * 60);

fn next_hop(deadline: Instant) -> Instant {
    match Instant::now().checked_add(MAX_HOP) {
        Some(limit) => deadline.min(limit),
        None => deadline,
    }
}

// == Timers ==
/// The delay queue plus the per-key bookkeeping kept next to it.
///
/// `DelayQueue` panics on deadlines too far past the point its wheel last
/// advanced to, and the wheel only advances when something fires. Deadlines
/// are therefore queued in hops of at most [`MAX_HOP`], and the queue is
/// rebuilt when a hop would land beyond [`WHEEL_SPAN`] of its last firing.
struct Timers {
    queue: DelayQueue<ExpiryTask>,
    pending: HashMap<String, Pending>,
    /// Lower bound of the instant the wheel has advanced to.
    epoch: Instant,
}

impl Timers {
    fn new() -> Self {
        Self {
            queue: DelayQueue::new(),
            pending: HashMap::new(),
            epoch: Instant::now(),
        }
    }

    fn len(&self) -> usize {
        self.pending.len()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queues `task`, replacing any earlier task for the same key. Returns
    /// the version of the replaced task.
    fn schedule(&mut self, task: ExpiryTask) -> Option<u64> {
        let previous = self.cancel(&task.key);
        let hop = next_hop(task.deadline);

        if self.queue.is_empty() {
            self.queue = DelayQueue::new();
            self.epoch = Instant::now();
        } else if hop.saturating_duration_since(self.epoch) > WHEEL_SPAN {
            self.rebuild();
        }

        let key = task.key.clone();
        let version = task.version;
        let token = self.queue.insert_at(task, hop);
        self.pending.insert(key, Pending { version, token });
        previous
    }

    /// Drops the task for `key`, returning its version.
    fn cancel(&mut self, key: &str) -> Option<u64> {
        let previous = self.pending.remove(key)?;
        self.queue.remove(&previous.token);
        Some(previous.version)
    }

    fn clear(&mut self) {
        self.queue = DelayQueue::new();
        self.pending.clear();
        self.epoch = Instant::now();
    }

    /// Moves every pending task onto a fresh queue anchored at now.
    fn rebuild(&mut self) {
        let mut queue = DelayQueue::with_capacity(self.pending.len());
        for pending in self.pending.values_mut() {
            let task = self.queue.remove(&pending.token).into_inner();
            let hop = next_hop(task.deadline);
            pending.token = queue.insert_at(task, hop);
        }
        debug!(pending = self.pending.len(), "Expiration queue rebuilt");
        self.queue = queue;
        self.epoch = Instant::now();
    }

    /// Waits for the next task whose real deadline has passed. Tasks that
    /// only reached an intermediate hop are queued again.
    async fn next_expired(&mut self) -> Option<ExpiryTask> {
        loop {
            let expired = poll_fn(|cx| self.queue.poll_expired(cx)).await?;
            self.epoch = self.epoch.max(expired.deadline());

            let task = expired.into_inner();
            if self
                .pending
                .get(&task.key)
                .is_some_and(|p| p.version == task.version)
            {
                self.pending.remove(&task.key);
            }

            if task.deadline <= Instant::now() {
                return Some(task);
            }
            debug!(key = %task.key, version = task.version, "Expiration re-queued");
            self.schedule(task);
        }
    }
}

// == Expiry Scheduler ==
/// Handle to the expiration task. Cheap to clone; the task stops once every
/// handle has been dropped.
#[derive(Debug, Clone)]
pub struct ExpiryScheduler {
    commands: mpsc::UnboundedSender<Command>,
    pending: Arc<AtomicUsize>,
}

impl ExpiryScheduler {
    // == Spawn ==
    /// Spawns the scheduler on the current Tokio runtime.
    ///
    /// `on_expire(key, version)` runs when a deadline passes and returns
    /// whether an entry was removed. It must perform its version comparison
    /// and removal under the store's lock.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<F>(on_expire: F) -> Self
    where
        F: Fn(&str, u64) -> bool + Send + 'static,
    {
        let (commands, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_scheduler(receiver, pending.clone(), on_expire));

        Self { commands, pending }
    }

    /// Schedules removal of `key` at `deadline` unless it has been rewritten
    /// since `version`. Replaces any earlier schedule for the key.
    pub fn schedule(&self, key: &str, version: u64, deadline: Instant) {
        self.send(Command::Schedule {
            key: key.to_string(),
            version,
            deadline,
        });
    }

    /// Drops the pending expiration of `key`, if any.
    pub fn cancel(&self, key: &str) {
        self.send(Command::Cancel {
            key: key.to_string(),
        });
    }

    /// Drops every pending expiration.
    pub fn cancel_all(&self) {
        self.send(Command::CancelAll);
    }

    /// Number of expirations currently waiting, as last seen by the task.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    fn send(&self, command: Command) {
        // Only fails once the task is gone, i.e. the runtime is shutting down.
        if self.commands.send(command).is_err() {
            debug!("Expiration scheduler is not running, command dropped");
        }
    }
}

// == Scheduler Loop ==
async fn run_scheduler<F>(
    mut commands: mpsc::UnboundedReceiver<Command>,
    pending_count: Arc<AtomicUsize>,
    on_expire: F,
) where
    F: Fn(&str, u64) -> bool,
{
    let mut timers = Timers::new();

    debug!("Expiration scheduler started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    Command::Schedule { key, version, deadline } => {
                        let task = ExpiryTask { key: key.clone(), version, deadline };
                        if let Some(previous) = timers.schedule(task) {
                            debug!(key = %key, version = previous, "Superseded expiration cancelled");
                        }
                    }
                    Command::Cancel { key } => {
                        if let Some(previous) = timers.cancel(&key) {
                            debug!(key = %key, version = previous, "Expiration cancelled");
                        }
                    }
                    Command::CancelAll => timers.clear(),
                }
            }
            Some(ExpiryTask { key, version, .. }) = timers.next_expired(), if !timers.is_empty() => {
                if on_expire(&key, version) {
                    debug!(key = %key, version, "Entry expired");
                } else {
                    debug!(key = %key, version, "Stale expiration ignored");
                }
            }
        }
        pending_count.store(timers.len(), Ordering::Relaxed);
    }

    info!("Expiration scheduler stopped");
}
