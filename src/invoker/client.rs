//! Core request/response sequence.

use log::{debug, warn};
use reqwest::Url;

use crate::error::InvokeError;
use crate::request::{HttpMethod, PayloadType, RequestHeaders};
use crate::transport::{Connection, HttpTransport, Transport};

use super::InvokerConfig;

/// `User-Agent` value stamped on every outgoing request. Applied after the
/// caller's headers, so it cannot be overridden.
const FORCED_USER_AGENT: &str = "*";

/// Invokes one HTTP(S) request per `execute` call.
///
/// Holds an immutable target URL and method; no state is carried across
/// calls. A connection is opened through the transport at the start of each
/// round trip and released exactly once before the call returns, on success
/// and on every error path.
#[derive(Debug)]
pub struct RequestInvoker<T: Transport = HttpTransport> {
    target_url: String,
    method: HttpMethod,
    config: InvokerConfig,
    transport: T,
}

impl RequestInvoker<HttpTransport> {
    /// Create an invoker for `target_url` with the default GET method.
    pub fn new(target_url: impl Into<String>) -> Result<Self, InvokeError> {
        Self::with_method(target_url, HttpMethod::default())
    }

    /// Create an invoker for `target_url` using `method`.
    pub fn with_method(
        target_url: impl Into<String>,
        method: HttpMethod,
    ) -> Result<Self, InvokeError> {
        Self::with_transport(target_url, method, HttpTransport)
    }
}

impl<T: Transport> RequestInvoker<T> {
    /// Create an invoker that performs its I/O through `transport`.
    ///
    /// Fails with `MissingUrl` when `target_url` is empty; the URL is not
    /// parsed until `execute`.
    pub fn with_transport(
        target_url: impl Into<String>,
        method: HttpMethod,
        transport: T,
    ) -> Result<Self, InvokeError> {
        let target_url = target_url.into();
        if target_url.is_empty() {
            return Err(InvokeError::MissingUrl);
        }
        Ok(Self {
            target_url,
            method,
            config: InvokerConfig::default(),
            transport,
        })
    }

    /// Replace the configuration (permissive TLS profile, timeouts).
    pub fn with_config(mut self, config: InvokerConfig) -> Self {
        self.config = config;
        self
    }

    /// Perform the round trip with no extra headers and no payload.
    pub fn execute(&self) -> Result<String, InvokeError> {
        self.execute_with(None, None, None)
    }

    /// Perform one full request/response round trip.
    ///
    /// Caller headers with a `None` value are skipped; `User-Agent` is
    /// always forced afterwards. A payload is written only when
    /// `payload_type` is given: it determines the `Content-Type` header,
    /// and a missing `payload` string still sends a zero-byte body. Note
    /// that writing a payload to a GET invoker sends the request as a POST.
    ///
    /// Returns the response body with its lines joined by `'\r'`, or the
    /// typed error of the phase that failed. A response outside the success
    /// range never yields a body; it becomes `HttpStatus { code, message }`.
    #[tracing::instrument(skip(self, headers, payload))]
    pub fn execute_with(
        &self,
        headers: Option<&RequestHeaders>,
        payload_type: Option<PayloadType>,
        payload: Option<&str>,
    ) -> Result<String, InvokeError> {
        let url =
            Url::parse(&self.target_url).map_err(|e| InvokeError::MalformedUrl(e.to_string()))?;

        debug!("Opening connection to {}...", url);
        let mut conn = ClosingConnection(self.transport.open(&url, &self.config)?);

        conn.0.set_method(self.method)?;

        if let Some(headers) = headers {
            for (name, value) in headers {
                if let Some(value) = value {
                    conn.0.set_header(name, value);
                }
            }
        }
        conn.0.set_header("User-Agent", FORCED_USER_AGENT);

        if let Some(payload_type) = payload_type {
            conn.0.set_header("Content-Type", payload_type.content_type());
            conn.0
                .write_payload(payload.unwrap_or_default().as_bytes())?;
        }

        let code = conn.0.read_status()?;
        debug!("{} {} -> {}", self.method, self.target_url, code);

        if self.config.is_success(code) {
            let body = conn.0.read_body()?;
            Ok(join_lines(&body))
        } else {
            let message = conn.0.read_status_message()?;
            warn!(
                "{} {} failed: {} {}",
                self.method, self.target_url, code, message
            );
            Err(InvokeError::HttpStatus { code, message })
        }
    }
}

/// Joins response lines with a carriage return appended after each line.
/// The separator is `'\r'` exactly, never `'\n'` or `"\r\n"`.
fn join_lines(body: &str) -> String {
    let mut joined = String::with_capacity(body.len() + 1);
    for line in body.lines() {
        joined.push_str(line);
        joined.push('\r');
    }
    joined
}

/// Releases the connection when the round trip ends, whichever way it ends.
struct ClosingConnection(Box<dyn Connection>);

impl Drop for ClosingConnection {
    fn drop(&mut self) {
        self.0.close();
    }
}
