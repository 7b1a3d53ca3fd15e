use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures surfaced to the request boundary. Identity enrichment never
/// produces one of these; its lookup errors are absorbed in `auth`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("user not authenticated")]
    Unauthenticated,

    #[error("room does not belong to the current user")]
    Forbidden,

    #[error("failed to fetch inserted room after create")]
    CreateVerification,

    #[error("failed to fetch updated room after edit")]
    UpdateVerification,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            // A write claimed success but the re-read found nothing; the
            // caller must decide whether to retry or alert.
            AppError::CreateVerification | AppError::UpdateVerification => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
