use crate::domain::models::UserStatus;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Inserts the user if absent and enables reminders. Idempotent.
    async fn upsert(&self, email: &str) -> Result<()>;
    /// Disables reminders for a known user. Returns `false` when the email
    /// was never registered.
    async fn disable(&self, email: &str) -> Result<bool>;
    /// Point-in-time copy of the registry, never a live reference.
    async fn snapshot(&self) -> Result<HashMap<String, UserStatus>>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}
