use axum::{
    Json,
    extract::{FromRequest, Request},
};
use http::StatusCode;
use oauth2_password::CoordinationError;
use serde::{Serialize, de::DeserializeOwned};

/// Body of every JSON API response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Msg")]
    pub msg: String,
}

impl ApiResponse {
    pub fn success(msg: &str) -> Json<Self> {
        Json(Self {
            success: true,
            msg: msg.to_string(),
        })
    }

    pub fn failure(msg: &str) -> Json<Self> {
        Json(Self {
            success: false,
            msg: msg.to_string(),
        })
    }
}

pub(crate) type ApiError = (StatusCode, Json<ApiResponse>);

pub(crate) const INTERNAL_ERROR: &str = "Internal error.";

/// Map a coordination error to its status and user-facing message.
///
/// Internal failures are logged and answered with `internal_msg` only.
pub(crate) fn error_response(err: CoordinationError, internal_msg: &str) -> ApiError {
    if err.is_internal() {
        let _ = err.log();
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::failure(internal_msg),
        );
    }

    let status = match err {
        CoordinationError::InvalidCredentials | CoordinationError::WrongPassword => {
            StatusCode::UNAUTHORIZED
        }
        _ => StatusCode::BAD_REQUEST,
    };
    (status, ApiResponse::failure(&err.to_string()))
}

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self, internal_msg: &str) -> Result<T, ApiError>;
}

impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self, internal_msg: &str) -> Result<T, ApiError> {
        self.map_err(|e| error_response(e, internal_msg))
    }
}

/// JSON request body. A body that does not decode is logged and answered with a
/// generic 500 in the [`ApiResponse`] format.
pub(crate) struct ApiJson<T>(pub(crate) T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::error!("Rejected request body: {}", rejection.body_text());
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(INTERNAL_ERROR),
                ))
            }
        }
    }
}
