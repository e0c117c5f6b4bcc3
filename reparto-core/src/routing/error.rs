use thiserror::Error;

use crate::{ErrorKind, LocationError};

/// Errors from routing-engine calls.
///
/// Variants group into three caller-facing kinds; see [`RoutingError::kind`].
/// None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// No locations were provided.
    #[error("at least one location is required")]
    EmptyInput,
    /// A location failed validation.
    #[error("location {index} is invalid: {reason}")]
    InvalidCoordinate {
        /// Position of the offending location in the input.
        index: usize,
        /// Validation failure.
        reason: LocationError,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing engine could not be reached.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The routing engine answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The routing engine answered without a body.
    #[error("{url} returned an empty body")]
    EmptyResponse {
        /// Requested URL.
        url: String,
    },
    /// The routing engine reported a failure code.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `NoTable`.
        code: String,
        /// Service message.
        message: String,
    },
    /// A required field was absent from the response.
    #[error("response is missing the `{field}` field")]
    MissingField {
        /// Field name.
        field: &'static str,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder message.
        message: String,
    },
    /// The matrix was not `n x n` for `n` input locations.
    #[error("expected a {expected}x{expected} matrix: {message}")]
    MalformedMatrix {
        /// Number of input locations.
        expected: usize,
        /// Shape description.
        message: String,
    },
}

impl RoutingError {
    /// Map the error onto its caller-facing category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::InvalidCoordinate { .. } => ErrorKind::InvalidInput,
            Self::Timeout { .. }
            | Self::NetworkError { .. }
            | Self::HttpError { .. }
            | Self::EmptyResponse { .. } => ErrorKind::UpstreamUnavailable,
            Self::ServiceError { .. }
            | Self::MissingField { .. }
            | Self::ParseError { .. }
            | Self::MalformedMatrix { .. } => ErrorKind::UpstreamProtocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RoutingError::EmptyInput, ErrorKind::InvalidInput)]
    #[case(
        RoutingError::EmptyResponse { url: "http://osrm/table".into() },
        ErrorKind::UpstreamUnavailable
    )]
    #[case(
        RoutingError::Timeout { url: "http://osrm/table".into(), timeout_secs: 5 },
        ErrorKind::UpstreamUnavailable
    )]
    #[case(
        RoutingError::MissingField { field: "distances" },
        ErrorKind::UpstreamProtocol
    )]
    fn errors_map_to_kinds(#[case] error: RoutingError, #[case] kind: ErrorKind) {
        assert_eq!(error.kind(), kind);
    }
}
