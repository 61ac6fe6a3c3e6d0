//! Error types for the request invoker.
//!
//! One variant per failure phase, so callers can tell where a round trip
//! broke without parsing messages. Nothing is retried or recovered
//! internally; every error propagates out of `execute` after the connection
//! has been released.

use std::fmt;

use crate::transport::TlsVersion;

/// Errors returned by `RequestInvoker` construction and `execute`.
#[derive(Debug)]
pub enum InvokeError {
    /// The target URL was empty at construction.
    MissingUrl,

    /// The target URL failed to parse.
    MalformedUrl(String),

    /// Transport-level connection setup failed (unreachable host, refused
    /// connection).
    ConnectionOpen(String),

    /// The pinned TLS version is not supported by the TLS backend.
    /// Permissive profile only.
    InvalidTlsVersion(TlsVersion),

    /// Building the trust-everything client failed. Permissive profile only.
    SslCertificateSetup(String),

    /// The transport rejected the HTTP method.
    Protocol(String),

    /// I/O failure while writing the request payload.
    PayloadWrite(String),

    /// I/O failure while reading the response status.
    ResponseCodeRead(String),

    /// I/O failure while reading the status message of a non-success
    /// response.
    ResponseMessageRead(String),

    /// The server answered outside the success range. Terminal for the
    /// call; no body is returned.
    HttpStatus { code: u16, message: String },

    /// I/O failure while reading the success response body.
    ResponseRead(String),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::MissingUrl => write!(f, "missing target URL"),
            InvokeError::MalformedUrl(msg) => write!(f, "malformed target URL: {}", msg),
            InvokeError::ConnectionOpen(msg) => write!(f, "failed to open connection: {}", msg),
            InvokeError::InvalidTlsVersion(version) => {
                write!(f, "TLS version {} is not supported by the runtime", version)
            }
            InvokeError::SslCertificateSetup(msg) => {
                write!(f, "failed to set up permissive certificate trust: {}", msg)
            }
            InvokeError::Protocol(msg) => {
                write!(f, "HTTP method rejected by the transport: {}", msg)
            }
            InvokeError::PayloadWrite(msg) => {
                write!(f, "failed to write request payload: {}", msg)
            }
            InvokeError::ResponseCodeRead(msg) => {
                write!(f, "failed to read response status: {}", msg)
            }
            InvokeError::ResponseMessageRead(msg) => {
                write!(f, "failed to read response status message: {}", msg)
            }
            InvokeError::HttpStatus { code, message } => write!(f, "{} : {}", code, message),
            InvokeError::ResponseRead(msg) => {
                write!(f, "failed to read response body: {}", msg)
            }
        }
    }
}

impl std::error::Error for InvokeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let err = InvokeError::HttpStatus {
            code: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "404 : Not Found");
    }

    #[test]
    fn test_invalid_tls_version_display_names_version() {
        let err = InvokeError::InvalidTlsVersion(TlsVersion::Tls1_1);
        assert!(err.to_string().contains("TLSv1.1"));
    }

    #[test]
    fn test_phase_errors_carry_cause() {
        let err = InvokeError::ConnectionOpen("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = InvokeError::PayloadWrite("broken pipe".to_string());
        assert!(err.to_string().contains("broken pipe"));
    }
}
