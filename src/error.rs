//! Error types shared by the record store, the intake workflow and the
//! birthday scan.

use thiserror::Error;

use crate::bot::workflow::{Field, InputKind};

#[derive(Debug, Error)]
pub enum BotError {
    #[error("user {0} is not an administrator")]
    Authorization(u64),

    #[error("{0}")]
    Validation(String),

    #[error("no active request for this user")]
    NoActiveSession,

    #[error("this step expects {expected}")]
    UnexpectedInputType { expected: InputKind },

    #[error("form is missing the {0} field")]
    IncompleteForm(Field),

    #[error("position not found: {0}")]
    UnknownPosition(String),

    #[error("position already exists: {0}")]
    DuplicateName(String),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("conversation storage error: {0}")]
    SessionStore(Box<dyn std::error::Error + Send + Sync>),

    #[error("delivery failed: {0}")]
    Dispatch(#[from] teloxide::RequestError),
}

impl BotError {
    /// Text shown to the admin whose interaction produced this error.
    pub fn user_message(&self) -> String {
        match self {
            BotError::Authorization(_) => "Sorry, you don't have access to this command.".to_string(),
            BotError::Validation(message) => message.clone(),
            BotError::NoActiveSession | BotError::UnexpectedInputType { .. } => {
                "There is no such request. Use /addemployee to start a new one.".to_string()
            }
            BotError::IncompleteForm(_) => {
                "The form was incomplete and has been discarded. Please start again with /addemployee.".to_string()
            }
            BotError::UnknownPosition(name) => format!(
                "Position '{name}' does not exist. The employee was not saved; add the position with /addposition and start again."
            ),
            BotError::DuplicateName(name) => format!("Position '{name}' already exists."),
            BotError::Storage(_) | BotError::SessionStore(_) | BotError::Dispatch(_) => {
                "Something went wrong while saving your data. Please try again later.".to_string()
            }
        }
    }
}

pub type Result<T, E = BotError> = std::result::Result<T, E>;
