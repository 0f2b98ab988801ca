use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::{Gateway, StorageError};

/// Database connectivity as observed once at startup.
///
/// Never refreshed afterwards: `/api-status` reports what the process saw
/// when it booted, not the current state of the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DbStatus(Arc<str>);

impl DbStatus {
    pub const OK: &'static str = "ok";

    pub fn ok() -> Self {
        Self(Arc::from(Self::OK))
    }

    pub fn from_ping(result: Result<(), StorageError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(error) => Self(Arc::from(error.message.as_str())),
        }
    }

    pub fn is_ok(&self) -> bool {
        &*self.0 == Self::OK
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub async fn check(gateway: &Gateway) -> DbStatus {
    let status = DbStatus::from_ping(gateway.ping().await);
    if status.is_ok() {
        tracing::info!("Database connection established");
    } else {
        tracing::error!(status = %status, "Database connection failed");
    }
    status
}
