use crate::application::scheduler::ReminderScheduler;
use crate::domain::error::DomainError;
use crate::domain::models::UserStatus;
use crate::domain::repository::UserRegistry;
use crate::infrastructure::validation::validate_email;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct ReminderService<R: UserRegistry> {
    registry: Arc<R>,
    scheduler: Arc<ReminderScheduler>,
}

impl<R: UserRegistry> ReminderService<R> {
    pub fn new(registry: Arc<R>, scheduler: Arc<ReminderScheduler>) -> Self {
        Self {
            registry,
            scheduler,
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Validates the address, registers it, and (re)starts its reminder
    /// job. Returns the normalized email used as the registry key.
    #[instrument(skip(self), fields(raw_email = raw_email))]
    pub async fn sign_in(&self, raw_email: &str) -> Result<String> {
        let email = validate_email(raw_email)?;
        self.registry.upsert(&email).await?;
        self.scheduler.start(&email).await;
        info!(email = %email, "User signed in and reminders started");
        Ok(email)
    }

    /// Disables reminders and cancels the job. The lookup uses the
    /// caller-supplied key verbatim; unknown emails fail with
    /// `EmailNotFound` while the job cancellation itself never fails.
    #[instrument(skip(self), fields(email = email))]
    pub async fn stop_reminders(&self, email: &str) -> Result<()> {
        if !self.registry.disable(email).await? {
            warn!(email = email, "Stop requested for unknown email");
            return Err(DomainError::EmailNotFound.into());
        }
        self.scheduler.stop(email).await;
        info!(email = email, "Reminders stopped");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<HashMap<String, UserStatus>> {
        self.registry.snapshot().await
    }

    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}
