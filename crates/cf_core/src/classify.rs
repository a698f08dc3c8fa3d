use std::fmt;

use crate::Error;

/// The fixed set of failures a user gets to see. Transport detail stays in
/// the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    NotFound,
    Rejected,
    ServerError,
    BadResponse,
    Internal,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => FailureKind::NotFound,
            400..=499 => FailureKind::Rejected,
            _ => FailureKind::ServerError,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FailureKind::Unreachable => "Could not reach the company service.",
            FailureKind::NotFound => "The company service has no data for this request.",
            FailureKind::Rejected => "The company service rejected the request.",
            FailureKind::ServerError => "The company service failed to respond.",
            FailureKind::BadResponse => "The company service returned an unexpected response.",
            FailureKind::Internal => "Something went wrong while preparing the request.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Status(status) => FailureKind::from_status(*status),
            Error::Http(e) if e.is_decode() => FailureKind::BadResponse,
            Error::Http(e) => match e.status() {
                Some(status) => FailureKind::from_status(status.as_u16()),
                None => FailureKind::Unreachable,
            },
            Error::Io(_) => FailureKind::Unreachable,
            Error::Serialization(_) | Error::InvalidResponse(_) => FailureKind::BadResponse,
            Error::InvalidUrl(_) | Error::Config(_) => FailureKind::Internal,
        }
    }
}
