//! Uniform result envelope returned by every public action.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Outcome of an action: `{success, error?, data?}`.
///
/// Actions never raise across the component boundary. The caller inspects
/// `success` and decides how to surface `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }

    /// Convert back into a `Result`, using the error message as the error.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

impl ActionResult<()> {
    /// Success without a payload.
    pub fn done() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for ActionResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
