//! Error types for remote reads.

use thiserror::Error;

/// Failure while reading one of the remote resources.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} responded with {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: reqwest::StatusCode,
    },

    /// The body was not valid JSON for the expected type.
    #[error("malformed payload from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The body was JSON but not shaped the way the resource should be.
    #[error("unexpected payload from {url}: {detail}")]
    Shape {
        /// Requested URL.
        url: String,
        /// What was wrong with the payload.
        detail: String,
    },
}
