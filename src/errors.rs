use thiserror::Error;

/// Top-level error type shared by every layer of the service.
///
/// The variants mirror the response taxonomy: each one maps to exactly one
/// HTTP status in the transport layer, and no operation lets a failure escape
/// without being converted into one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No session token, or the token is invalid or expired.
    #[error("user not authenticated")]
    Unauthenticated,

    /// Credential mismatch at login. Deliberately vague so a caller cannot
    /// tell which part of the credentials was wrong.
    #[error("incorrect credentials")]
    Unauthorized,

    /// A referenced account, tweet, or comment does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Authenticated but not permitted to perform the operation.
    #[error("{0}")]
    Forbidden(&'static str),

    /// A unique field (email, username) is already taken.
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Password hashing or verification failed.
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Anything else that should surface as a server-side failure.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("failed to serialize entity: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
