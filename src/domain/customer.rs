use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The remote customer record a session is attached to.
///
/// Only the identifier matters to the session: it keys the remembered
/// payment-method preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Customer {
    pub id: Option<String>,
    pub email: Option<String>,
    pub default_source: Option<String>,
}

impl Customer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Structured detail attached to a failed remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub param: Option<String>,
    pub doc_url: Option<String>,
}

/// Terminal error of a customer fetch.
///
/// `code` is the transport status code reported by the backend.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("customer fetch failed ({code}): {message}")]
pub struct CustomerFetchError {
    pub code: i32,
    pub message: String,
    pub detail: Option<ErrorDetail>,
}

impl CustomerFetchError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}
