pub mod client;
pub mod types;

use std::fmt;

use crate::modules::customers::Customer;
use self::types::{LoginResponse, RegisterRequest, SendCodeResponse};

/// Shown for any failure where the request never reached the server; the
/// same line everywhere so forms do not disagree about network trouble.
pub const TRANSPORT_ERROR: &str = "An error occurred. Please try again later.";

/// Failure of a collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `message` carries the
    /// server-provided text when the error body could be parsed.
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// The request never completed (connection refused, timeout, bad URL).
    Transport(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    /// Message for the form: server text verbatim when present, the given
    /// fallback for a rejection without one, and a generic retry-later line
    /// for transport failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(text),
                ..
            } => text.clone(),
            ApiError::Rejected { .. } => fallback.to_string(),
            ApiError::Transport(_) => TRANSPORT_ERROR.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Rejected { status, message } => match message {
                Some(text) => write!(f, "request rejected ({}): {}", status, text),
                None => write!(f, "request rejected ({})", status),
            },
            ApiError::Transport(detail) => write!(f, "transport failure: {}", detail),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend, one method per endpoint. Flows depend on this trait so tests
/// can substitute a scripted stub for the real HTTP client.
pub trait ApiClient {
    fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;
    fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
    fn send_code(&self, email: &str) -> Result<SendCodeResponse, ApiError>;
    fn verify_code(&self, code: &str, user_id: &str) -> Result<(), ApiError>;
    fn reset_password(&self, user_id: &str, new_password: &str) -> Result<(), ApiError>;
    fn change_password(
        &self,
        user_id: &str,
        password: &str,
        new_password: &str,
    ) -> Result<(), ApiError>;
    fn get_customers(&self) -> Result<Vec<Customer>, ApiError>;
    fn add_customer(&self, customer: &Customer) -> Result<(), ApiError>;
}
