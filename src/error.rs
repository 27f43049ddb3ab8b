use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::{
        commission::CommissionError, geo::GeoError, order_status::TransitionError,
        settlement::SettlementError,
    },
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("Too Many Requests")]
    TooManyRequests { retry_after: u64 },

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitData {
    error: String,
    retry_after: u64,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match &self {
            AppError::DbError(err) => tracing::error!(error = %err, "database error"),
            AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        if let AppError::TooManyRequests { retry_after } = self {
            let body = ApiResponse {
                message: self.to_string(),
                data: Some(RateLimitData {
                    error: "Rate limit exceeded".into(),
                    retry_after,
                }),
                meta: Some(Meta::empty()),
            };
            let mut response = (status, axum::Json(body)).into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            return response;
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Forbidden { .. } => AppError::Forbidden,
            TransitionError::Unknown(_) => AppError::BadRequest(err.to_string()),
            TransitionError::Terminal(_) | TransitionError::NotAllowed { .. } => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<CommissionError> for AppError {
    fn from(err: CommissionError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
