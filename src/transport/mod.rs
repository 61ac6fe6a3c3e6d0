//! Transport abstraction over the HTTP connection lifecycle.
//!
//! The invoker core never touches the network directly; it drives a
//! [`Connection`] obtained from a [`Transport`]. Both traits are mockable so
//! the full execute sequence can be tested without I/O, with failure
//! injection at every phase and release-exactly-once accounting.

mod http;
mod tls;

pub use http::HttpTransport;
pub use tls::TlsVersion;

use reqwest::Url;

use crate::error::InvokeError;
use crate::invoker::InvokerConfig;
use crate::request::HttpMethod;

/// Opens connections to a parsed target URL.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Open a connection to `url`.
    ///
    /// When `config` enables the permissive TLS profile and the scheme is
    /// `https`, the connection trusts any certificate and pins the configured
    /// TLS version. Fails with `ConnectionOpen`, or with
    /// `InvalidTlsVersion` / `SslCertificateSetup` when the permissive
    /// profile cannot be installed.
    fn open(&self, url: &Url, config: &InvokerConfig)
    -> Result<Box<dyn Connection>, InvokeError>;
}

/// One open connection, scoped to a single request/response round trip.
///
/// Methods mirror the phases of the round trip so each failure surfaces at
/// its own point. The invoker calls `close` exactly once, on every exit
/// path.
#[cfg_attr(test, mockall::automock)]
pub trait Connection: std::fmt::Debug {
    /// Set the HTTP method. Fails with `Protocol` if the transport rejects
    /// the method.
    fn set_method(&mut self, method: HttpMethod) -> Result<(), InvokeError>;

    /// Set a request header, replacing any previous value for the name.
    fn set_header(&mut self, name: &str, value: &str);

    /// Write the raw request body. Fails with `PayloadWrite`.
    fn write_payload(&mut self, body: &[u8]) -> Result<(), InvokeError>;

    /// Read the response status code. Fails with `ResponseCodeRead`; a
    /// connection failure during dispatch surfaces as `ConnectionOpen`.
    fn read_status(&mut self) -> Result<u16, InvokeError>;

    /// Read the response status message. Fails with `ResponseMessageRead`.
    fn read_status_message(&mut self) -> Result<String, InvokeError>;

    /// Read the raw response body. Fails with `ResponseRead`.
    fn read_body(&mut self) -> Result<String, InvokeError>;

    /// Tear down the connection.
    fn close(&mut self);
}
