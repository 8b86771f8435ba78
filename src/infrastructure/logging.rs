use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// Default filter when RUST_LOG is unset: the SMTP transport is chatty at
// info level, so it is capped at warn.
const DEFAULT_DIRECTIVES: &str = "info,task_reminder_api=debug,lettre=warn";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
