use serde::Serialize;
use thiserror::Error;

use crate::analyzer::AnalyzeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Analysis(#[from] AnalyzeError),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::{http::StatusCode, Json};
        #[derive(Serialize)]
        struct ErrBody {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }
        match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrBody {
                    error: msg,
                    details: None,
                }),
            )
                .into_response(),
            AppError::Analysis(e) => {
                tracing::error!("analysis error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrBody {
                        error: "Failed to analyze wallet".into(),
                        details: Some(e.to_string()),
                    }),
                )
                    .into_response()
            }
        }
    }
}
