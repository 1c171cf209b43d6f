use axum::extract::rejection::{JsonRejection, QueryRejection};
use thiserror::Error;

/// A rule the estate facts must satisfy before they reach the engine.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("net worth must be a finite amount >= 0 (got {0})")]
    InvalidNetWorth(f64),

    #[error("separate property must be a finite amount >= 0 (got {0})")]
    InvalidSeparateProperty(f64),

    #[error("separate property ({separate}) cannot exceed net worth ({net_worth})")]
    SeparatePropertyExceedsNetWorth { separate: f64, net_worth: f64 },

    #[error("life insurance must be a finite amount >= 0 (got {0})")]
    InvalidLifeInsurance(f64),

    #[error(
        "joint children + separate children must equal total children ({joint} + {separate} != {total})"
    )]
    ChildCountMismatch { joint: u32, separate: u32, total: u32 },
}

impl InputError {
    /// Payload key of the offending value.
    pub fn field(&self) -> &'static str {
        match self {
            InputError::InvalidNetWorth(_) => "netWorth",
            InputError::InvalidSeparateProperty(_)
            | InputError::SeparatePropertyExceedsNetWorth { .. } => "separatePropertyAmount",
            InputError::InvalidLifeInsurance(_) => "lifeInsuranceAmount",
            InputError::ChildCountMismatch { .. } => "totalChildren",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Input(#[from] InputError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::Input(err) => Some(err.field()),
            _ => None,
        }
    }
}
