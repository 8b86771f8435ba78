use crate::domain::models::{REMINDER_BODY, REMINDER_INTERVAL, REMINDER_SUBJECT};
use crate::domain::repository::Mailer;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, trace};

/// Owns at most one live recurring reminder job per email.
///
/// Each job is a spawned task that sleeps a full interval between firings,
/// so the first email goes out one interval after `start`, never
/// immediately. The job map mutex serializes lifecycle operations per key;
/// it is only held for handle bookkeeping, never across a send.
pub struct ReminderScheduler {
    mailer: Arc<dyn Mailer>,
    interval: Duration,
    jobs: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl ReminderScheduler {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self::with_interval(mailer, REMINDER_INTERVAL)
    }

    /// Same scheduler with a custom firing interval.
    pub fn with_interval(mailer: Arc<dyn Mailer>, interval: Duration) -> Self {
        Self {
            mailer,
            interval,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedules a recurring reminder job for `email`, replacing any
    /// existing one. Replacement aborts the old handle before the new one
    /// is installed, so re-signing in resets the countdown and the old
    /// handle can never fire again.
    #[instrument(skip(self), fields(email = email))]
    pub async fn start(&self, email: &str) {
        let mut jobs = self.jobs.lock().await;
        if let Some(old) = jobs.remove(email) {
            old.abort();
            debug!(email = email, "Replaced existing reminder job");
        }

        let mailer = Arc::clone(&self.mailer);
        let interval = self.interval;
        let to = email.to_string();
        let handle = tokio::spawn(async move {
            loop {
                sleep(interval).await;
                trace!(email = %to, "Reminder job fired");
                let mailer = Arc::clone(&mailer);
                let recipient = to.clone();
                // The send runs detached so aborting this loop never
                // cancels a delivery already in flight.
                tokio::spawn(async move {
                    match mailer
                        .send(&recipient, REMINDER_SUBJECT, REMINDER_BODY)
                        .await
                    {
                        Ok(()) => {
                            info!(email = %recipient, "Reminder email sent");
                        }
                        Err(e) => {
                            // Log and keep the job alive; the next firing
                            // happens at the regular interval regardless.
                            error!(email = %recipient, error = %e, "Failed to send reminder email");
                        }
                    }
                });
            }
        });

        jobs.insert(email.to_string(), handle);
        info!(email = email, interval_secs = self.interval.as_secs(), "Reminder job scheduled");
    }

    /// Cancels the reminder job for `email` if one exists. A no-op for
    /// unknown or already-stopped emails.
    #[instrument(skip(self), fields(email = email))]
    pub async fn stop(&self, email: &str) {
        let mut jobs = self.jobs.lock().await;
        match jobs.remove(email) {
            Some(handle) => {
                handle.abort();
                info!(email = email, "Reminder job cancelled");
            }
            None => {
                trace!(email = email, "No reminder job to cancel");
            }
        }
    }

    /// Whether a live job exists for `email`.
    pub async fn is_scheduled(&self, email: &str) -> bool {
        self.jobs.lock().await.contains_key(email)
    }

    /// Aborts every live job and clears the map.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        let mut jobs = self.jobs.lock().await;
        let count = jobs.len();
        for (_, handle) in jobs.drain() {
            handle.abort();
        }
        info!(cancelled = count, "Scheduler shut down");
    }
}
