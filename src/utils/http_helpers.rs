use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
///
/// All error responses share one body shape: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Handler helpers unwrap `Result<_, HTTPError>` in their own tests, so
    // the error must stay debug-printable.
    #[test]
    fn http_error_is_debug_printable() {
        let err = HTTPError::new(StatusCode::UNPROCESSABLE_ENTITY, "bad shape");
        let printed = format!("{:?}", err);
        assert!(printed.contains("422"));
        assert!(printed.contains("bad shape"));
    }

    #[test]
    fn http_error_response_keeps_the_status() {
        let response =
            HTTPError::new(StatusCode::BAD_REQUEST, "malformed request body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
