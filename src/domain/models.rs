use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// How often a reminder job fires.
pub const REMINDER_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

pub const REMINDER_SUBJECT: &str = "Task Reminder";
pub const REMINDER_BODY: &str = "This is your 12-hour reminder to check your tasks.";

/// Per-user reminder state as exposed by the registry and `/status`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserStatus {
    pub reminders: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub users: HashMap<String, UserStatus>,
}
