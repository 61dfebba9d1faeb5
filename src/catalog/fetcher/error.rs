use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// FetchError is returned by a [`crate::catalog::fetcher::Fetcher`] when the remote catalog could not be obtained.
/// Every variant is treated as a failed fetch by the refresh cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchError {
    /// The remote source could not be reached.
    Network(String),
    /// The remote source responded with a non-success status.
    Status(u16),
    /// The remote source responded without a body.
    EmptyBody,
    /// The fetch did not complete within the configured fetch timeout.
    Timeout(Duration),
    /// The fetcher panicked.
    Panicked,
    /// The fetch could not be started.
    WorkerUnavailable(String),
}

impl Display for FetchError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(reason) =>
                write!(formatter, "network error: {}", reason),
            FetchError::Status(status) =>
                write!(formatter, "non-success response status {}", status),
            FetchError::EmptyBody =>
                write!(formatter, "response did not carry a body"),
            FetchError::Timeout(timeout) =>
                write!(formatter, "fetch did not complete within {:?}", timeout),
            FetchError::Panicked =>
                write!(formatter, "fetcher panicked"),
            FetchError::WorkerUnavailable(reason) =>
                write!(formatter, "could not start the fetch worker: {}", reason),
        }
    }
}

impl Error for FetchError {}
