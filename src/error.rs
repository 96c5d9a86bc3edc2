use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid grade ordinal {0}, expected 0-3")]
    InvalidGrade(u8),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("missing required query parameter: {0}")]
    MissingParam(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidGrade(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnknownCard(_) => StatusCode::NOT_FOUND,
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("request failed: {self}");
        }

        (status, self.to_string()).into_response()
    }
}
