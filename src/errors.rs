use axum::http::StatusCode;
use crate::models::TweetId;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    pub fn not_found(id: TweetId) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("tweet {id} not found"),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Why a toggle round trip did not reach reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error("no like button for tweet {0} on the page")]
    UnknownTarget(TweetId),
    #[error("invalid action url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server answered {0}")]
    ResponseStatus(reqwest::StatusCode),
    #[error("unexpected response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}
