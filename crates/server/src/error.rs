use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use svcamount_api::TransportError;
use svcamount_engine::AmountError;
use svcamount_registry::ClassifyError;
use svcamount_types::ApiResponse;

/// Handler error; renders as an [`ApiResponse`] body.
#[derive(Debug)]
pub struct ApiError(pub AmountError);

impl From<AmountError> for ApiError {
    fn from(error: AmountError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AmountError::Classify(ClassifyError::UnknownService { .. }) => StatusCode::NOT_FOUND,
            AmountError::Resolve(_) => StatusCode::BAD_REQUEST,
            AmountError::Transport(TransportError::Build(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AmountError::Transport(_) => StatusCode::BAD_GATEWAY,
            AmountError::Config(_) | AmountError::Classify(ClassifyError::InvalidEntry { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::new(status.as_u16(), self.0.to_string(), Some(self.0.reason().to_string()));
        (status, Json(body)).into_response()
    }
}
