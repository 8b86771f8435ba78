use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    InvalidEmail(String),
    #[error("Email not found.")]
    EmailNotFound,
}
