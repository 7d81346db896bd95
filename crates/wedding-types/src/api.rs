use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on guest names, shared with the CHECK constraint in the store.
pub const MAX_NAME_LEN: usize = 100;

pub const DEFAULT_GUESTS_COUNT: i64 = 1;
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// A field rule violated by an otherwise well-typed request body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{0} must not be negative")]
    Negative(&'static str),
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("name"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

// -- Wishes --

#[derive(Debug, Clone, Deserialize)]
pub struct WishCreate {
    pub name: String,
    pub wish_text: String,
}

impl WishCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        if self.wish_text.trim().is_empty() {
            return Err(ValidationError::Empty("wish_text"));
        }
        Ok(())
    }
}

// -- Confirmations --

/// `attending` has no default: a request that leaves it out is rejected
/// rather than counted as a yes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationCreate {
    pub name: String,
    pub attending: bool,
    #[serde(default = "default_guests_count")]
    pub guests_count: i64,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_guests_count() -> i64 {
    DEFAULT_GUESTS_COUNT
}

impl ConfirmationCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        if self.guests_count < 0 {
            return Err(ValidationError::Negative("guests_count"));
        }
        Ok(())
    }
}

// -- Listing --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

// -- Misc --

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
}

/// Error payload returned by every failing API route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
