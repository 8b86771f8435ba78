use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use task_reminder_api::application::scheduler::ReminderScheduler;
use task_reminder_api::application::service::ReminderService;
use task_reminder_api::data::registry::InMemoryUserRegistry;
use task_reminder_api::infrastructure::logging::init_logging;
use task_reminder_api::infrastructure::smtp::SmtpMailer;
use task_reminder_api::presentation::handlers::{
    AppState, health_check, signin, status, stop_reminders,
};
use task_reminder_api::presentation::middleware::RequestTraceMiddleware;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize logging
    init_logging();
    info!("Logging initialized successfully");

    info!("Configuring SMTP mailer from environment");
    let mailer = SmtpMailer::from_env()?;

    info!("Creating in-memory user registry");
    let registry = Arc::new(InMemoryUserRegistry::new());

    info!("Creating reminder scheduler");
    let scheduler = Arc::new(ReminderScheduler::new(Arc::new(mailer)));

    info!("Creating reminder service");
    let service = ReminderService::new(registry, scheduler);

    info!("Initializing application state");
    let state = web::Data::new(AppState { service });
    let state_for_shutdown = state.clone();

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestTraceMiddleware)
            .route("/health", web::get().to(health_check))
            .route("/signin", web::post().to(signin))
            .route("/stop-reminders", web::post().to(stop_reminders))
            .route("/status", web::get().to(status))
    });

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);
    let bind_addr = format!("0.0.0.0:{}", port);
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind(("0.0.0.0", port))?;

    info!(
        address = %bind_addr,
        routes = %"GET /health, POST /signin, POST /stop-reminders, GET /status",
        "Starting HTTP server"
    );
    server.run().await?;

    info!("Server stopped, cancelling reminder jobs");
    state_for_shutdown.service.shutdown().await;
    Ok(())
}
