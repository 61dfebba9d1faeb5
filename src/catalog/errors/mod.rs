use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::catalog::fetcher::error::FetchError;
use crate::catalog::store::error::StoreError;

const ERROR_MESSAGE_TTL_GT_ZERO: &str = "Time to live of the cached catalog must be greater than zero";
const ERROR_MESSAGE_FETCH_TIMEOUT_GT_ZERO: &str = "Fetch timeout must be greater than zero";
const ERROR_MESSAGE_RELATED_LIMIT_GT_ZERO: &str = "Limit of related products must be greater than zero";
const ERROR_MESSAGE_TRENDING_RATING_IN_RANGE: &str = "Trending rating must be within the rating bounds";
const ERROR_MESSAGE_FETCH_FAILED: &str = "Fetching the remote catalog failed";
const ERROR_MESSAGE_STORE_WRITE_FAILED: &str = "Replacing the cached catalog failed";
const ERROR_MESSAGE_NOT_FOUND: &str = "No product found with id";

/// Errors enum defines the configuration errors, returned by [`crate::catalog::config::ConfigBuilder::build`].
#[derive(Eq, PartialEq, Debug)]
pub enum Errors {
    TtlGtZero,
    FetchTimeoutGtZero,
    RelatedLimitGtZero,
    TrendingRatingInRange,
}

pub(crate) enum ErrorType {
    ConfigError,
    OperationError(&'static str),
}

impl Display for ErrorType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::ConfigError =>
                write!(formatter, "Config error"),
            ErrorType::OperationError(operation) =>
                write!(formatter, "Operation {}", operation),
        }
    }
}

impl Display for Errors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Errors::TtlGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_TTL_GT_ZERO),
            Errors::FetchTimeoutGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_FETCH_TIMEOUT_GT_ZERO),
            Errors::RelatedLimitGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_RELATED_LIMIT_GT_ZERO),
            Errors::TrendingRatingInRange =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_TRENDING_RATING_IN_RANGE),
        }
    }
}

impl Error for Errors {}

/// RefreshError is the outcome of a failed refresh cycle.
/// Neither variant changes the cached catalog or the time of the last refresh, so the stale catalog keeps serving reads.
#[derive(Clone, Debug, PartialEq)]
pub enum RefreshError {
    FetchFailed(FetchError),
    StoreWriteFailed(StoreError),
}

impl Display for RefreshError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshError::FetchFailed(error) =>
                write!(formatter, "[{}]: {}, {}", ErrorType::OperationError("refresh"), ERROR_MESSAGE_FETCH_FAILED, error),
            RefreshError::StoreWriteFailed(error) =>
                write!(formatter, "[{}]: {}, {}", ErrorType::OperationError("refresh"), ERROR_MESSAGE_STORE_WRITE_FAILED, error),
        }
    }
}

impl Error for RefreshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RefreshError::FetchFailed(error) => Some(error),
            RefreshError::StoreWriteFailed(error) => Some(error),
        }
    }
}

/// CatalogError is returned by the single-value reads of [`crate::catalog::coordinator::CacheCoordinator`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CatalogError {
    NotFound(String),
}

impl Display for CatalogError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) =>
                write!(formatter, "[{}]: {} '{}'", ErrorType::OperationError("product_by_id"), ERROR_MESSAGE_NOT_FOUND, id),
        }
    }
}

impl Error for CatalogError {}
