use thiserror::Error;

use crate::wizard::WizardNotice;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Could not issue an unused share token after {attempts} attempts")]
    TokenExhausted { attempts: u32 },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Raised by stores when a schedule is created with a token that is already
/// taken. Travels inside an `eyre::Report`; callers find it with
/// `downcast_ref`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Share token {0} is already in use")]
pub struct TokenInUse(pub String);

impl From<WizardNotice> for ScheduleError {
    fn from(notice: WizardNotice) -> Self {
        ScheduleError::Validation(notice.to_string())
    }
}
