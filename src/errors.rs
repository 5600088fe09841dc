use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the persisted key/value layer. `Read` and `Malformed` are read
/// errors, `Write` and `Encode` are write errors; none of them reach the user.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed value under `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. }
            | Self::Malformed { key, .. }
            | Self::Write { key, .. }
            | Self::Encode { key, .. } => key,
        }
    }
}

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

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
