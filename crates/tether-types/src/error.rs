use thiserror::Error;

/// A user-facing failure. The first three digits of `code` are the HTTP
/// status it maps to, e.g. 40400 is a 404 and 40900 a 409.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApplicationError {
    pub code: u32,
    pub message: String,
}

pub const BAD_REQUEST: u32 = 40000;
pub const UNAUTHORIZED: u32 = 40100;
pub const NOT_FOUND: u32 = 40400;
pub const CONFLICT: u32 = 40900;
pub const INTERNAL: u32 = 50000;

impl ApplicationError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(CONFLICT, message)
    }

    /// Leading three decimal digits of the error code. Codes shorter than
    /// three digits carry no status and map to 500.
    pub fn status_code(&self) -> u16 {
        let mut n = self.code;
        if n < 100 {
            return 500;
        }
        while n >= 1000 {
            n /= 10;
        }
        n as u16
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == 409
    }
}

/// Error returned by every core operation.
///
/// `Application` errors are safe to show to users as-is. `Internal` errors
/// carry diagnostic detail that must only ever be logged.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Application(#[from] ApplicationError),
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn as_application(&self) -> Option<&ApplicationError> {
        match self {
            Self::Application(e) => Some(e),
            Self::Internal(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_application().is_some_and(ApplicationError::is_not_found)
    }

    pub fn is_conflict(&self) -> bool {
        self.as_application().is_some_and(ApplicationError::is_conflict)
    }
}
