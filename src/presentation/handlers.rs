use crate::application::service::ReminderService;
use crate::data::registry::InMemoryUserRegistry;
use crate::domain::error::DomainError;
use crate::domain::models::{ApiMessage, EmailRequest, StatusResponse};
use actix_web::{HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

// AppState holding the service
pub struct AppState {
    pub service: ReminderService<InMemoryUserRegistry>,
}

// Reminder API Error Types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            // The stop-reminders contract reports unknown emails as 400,
            // not 404.
            ApiError::Validation(_) | ApiError::NotFound(_) => {
                actix_web::http::StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            ApiError::Validation(_) => {
                warn!(error = %message, status = %status, "Validation error")
            }
            ApiError::NotFound(_) => {
                warn!(error = %message, status = %status, "Email not found")
            }
            ApiError::Internal(_) => {
                error!(error = %message, status = %status, "Internal error")
            }
        }

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "message": message,
        }))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::InvalidEmail(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::EmailNotFound) => ApiError::NotFound("Email not found.".to_string()),
            None => ApiError::Internal(err.to_string()),
        }
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument(skip(state), fields(email))]
pub async fn signin(
    state: web::Data<AppState>,
    req: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(raw_email = %req.email, "Sign-in request received");
    let email = state.service.sign_in(&req.email).await.map_err(|e| {
        warn!(raw_email = %req.email, error = %e, "Sign-in rejected");
        ApiError::from(e)
    })?;
    tracing::Span::current().record("email", email.as_str());
    info!(email = %email, "Signed in and reminders started");
    Ok(HttpResponse::Ok().json(ApiMessage {
        success: true,
        message: "Signed in and reminders started.".to_string(),
    }))
}

#[instrument(skip(state), fields(email = %req.email))]
pub async fn stop_reminders(
    state: web::Data<AppState>,
    req: web::Json<EmailRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(email = %req.email, "Stop-reminders request received");
    state.service.stop_reminders(&req.email).await.map_err(|e| {
        warn!(email = %req.email, error = %e, "Failed to stop reminders");
        ApiError::from(e)
    })?;
    info!(email = %req.email, "Reminders stopped");
    Ok(HttpResponse::Ok().json(ApiMessage {
        success: true,
        message: "Reminders stopped.".to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn status(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state.service.status().await.map_err(|e| {
        error!(error = %e, "Failed to read registry snapshot");
        ApiError::from(e)
    })?;
    info!(count = users.len(), "Status snapshot returned");
    Ok(HttpResponse::Ok().json(StatusResponse { users }))
}
