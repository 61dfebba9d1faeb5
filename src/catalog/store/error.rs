use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::catalog::product::InvalidProduct;

/// StoreError is returned by [`crate::catalog::store::Store::replace_all`] when the new snapshot could not be installed.
/// A failed replace leaves the current snapshot untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreError {
    InvalidRecord { id: String, reason: InvalidProduct },
}

impl Display for StoreError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidRecord { id, reason } =>
                write!(formatter, "record '{}' is invalid: {}", id, reason),
        }
    }
}

impl Error for StoreError {}
