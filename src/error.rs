//! Error taxonomy for the client and search layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration absent; nothing proceeds without it.
    #[error("missing required configuration: {0}")]
    ConfigMissing(&'static str),

    /// Configuration present but unusable.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A named table could not be resolved, even after a forced refresh.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// No table was specified and no default is configured.
    #[error("no table specified and no default table configured")]
    TableRequired,

    /// The service answered with an error status or an unusable body.
    #[error("remote service returned {status}: {body}")]
    Remote { status: u16, body: serde_json::Value },

    /// Network-level failure reaching the service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
