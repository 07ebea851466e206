//! Error types shared across the store service
//!
//! Store actions other than checkout never fail; errors otherwise only arise
//! while loading the catalog, running tools, or answering HTTP requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::models::ProductId;

/// Errors raised while loading or querying the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog JSON did not match the product schema.
    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share the same identifier.
    #[error("Duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A filter dimension name other than brand, gender or category.
    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),
}

/// Errors raised when a checkout cannot be started.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Completion is scheduled on a tokio timer; none is running.
    #[error("no tokio runtime to complete the checkout on")]
    NoRuntime,
}

/// Errors produced while dispatching a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("Failed to serialize tool output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("Checkout unavailable: {0}")]
    Checkout(#[from] CheckoutError),
}

/// HTTP-facing error for the presentation routes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        tracing::warn!(error = %self, status = %status, "Request rejected");

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
