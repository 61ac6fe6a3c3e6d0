//! Production transport over a blocking reqwest client.

use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};

use crate::error::InvokeError;
use crate::invoker::InvokerConfig;
use crate::request::HttpMethod;

use super::Connection;

/// Opens one blocking HTTP(S) connection per request.
///
/// A fresh client is built on every `open` call, so nothing is pooled or
/// cached across invocations and the connection lives exactly as long as the
/// round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl super::Transport for HttpTransport {
    fn open(
        &self,
        url: &Url,
        config: &InvokerConfig,
    ) -> Result<Box<dyn Connection>, InvokeError> {
        let insecure = config.allow_insecure_tls && url.scheme() == "https";

        // reqwest's blocking client times out after 30s unless told otherwise;
        // no timeout exists here unless one is configured.
        let mut builder = Client::builder().timeout(config.read_timeout);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if insecure {
            let version = config.forced_tls_version;
            if !version.runtime_supported() {
                return Err(InvokeError::InvalidTlsVersion(version));
            }
            debug!(
                "Using permissive TLS for {}: trusting all certificates, pinning {}",
                url, version
            );
            builder = builder
                .danger_accept_invalid_certs(true)
                .min_tls_version(version.as_reqwest())
                .max_tls_version(version.as_reqwest());
        }

        let client = builder.build().map_err(|e| {
            if insecure {
                InvokeError::SslCertificateSetup(e.to_string())
            } else {
                InvokeError::ConnectionOpen(e.to_string())
            }
        })?;

        Ok(Box::new(HttpConnection::new(client, url.clone())))
    }
}

/// A single-use connection over a blocking reqwest client.
///
/// Method, headers, and body are accumulated and the request is dispatched
/// on the first status read, so the connection is prepared to send a body
/// for any method up to that point.
#[derive(Debug)]
struct HttpConnection {
    client: Client,
    url: Url,
    method: HttpMethod,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    response: Option<Response>,
    closed: bool,
}

impl HttpConnection {
    fn new(client: Client, url: Url) -> Self {
        Self {
            client,
            url,
            method: HttpMethod::default(),
            headers: HeaderMap::new(),
            body: None,
            response: None,
            closed: false,
        }
    }

    fn send_if_needed(&mut self) -> Result<&mut Response, InvokeError> {
        if self.closed {
            return Err(InvokeError::ResponseCodeRead(
                "connection is closed".to_string(),
            ));
        }
        if self.response.is_none() {
            // A written body turns a GET into a POST on the wire.
            let method = if self.body.is_some() && self.method == HttpMethod::Get {
                Method::POST
            } else {
                as_reqwest_method(self.method)
            };
            debug!("{} {}...", method, self.url);

            let mut request = self
                .client
                .request(method, self.url.clone())
                .headers(self.headers.clone());
            if let Some(body) = &self.body {
                request = request.body(body.clone());
            }

            let response = request.send().map_err(classify_send_error)?;
            self.response = Some(response);
        }
        self.response
            .as_mut()
            .ok_or_else(|| InvokeError::ResponseCodeRead("connection is closed".to_string()))
    }
}

impl Connection for HttpConnection {
    fn set_method(&mut self, method: HttpMethod) -> Result<(), InvokeError> {
        // The closed method set is always valid for this transport.
        self.method = method;
        Ok(())
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!("Skipping header with invalid name or value: {:?}", name),
        }
    }

    fn write_payload(&mut self, body: &[u8]) -> Result<(), InvokeError> {
        self.body = Some(body.to_vec());
        Ok(())
    }

    fn read_status(&mut self) -> Result<u16, InvokeError> {
        let response = self.send_if_needed()?;
        Ok(response.status().as_u16())
    }

    fn read_status_message(&mut self) -> Result<String, InvokeError> {
        let response = self.send_if_needed()?;
        Ok(response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string())
    }

    fn read_body(&mut self) -> Result<String, InvokeError> {
        self.send_if_needed()?;
        let response = self
            .response
            .take()
            .ok_or_else(|| InvokeError::ResponseRead("connection is closed".to_string()))?;
        response
            .text()
            .map_err(|e| InvokeError::ResponseRead(e.to_string()))
    }

    fn close(&mut self) {
        // Dropping the in-flight response tears down the connection.
        self.response.take();
        self.closed = true;
    }
}

fn as_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Put => Method::PUT,
    }
}

/// Maps a send-time reqwest error back onto the phase it belongs to.
fn classify_send_error(error: reqwest::Error) -> InvokeError {
    if error.is_connect() {
        InvokeError::ConnectionOpen(error.to_string())
    } else if error.is_body() {
        InvokeError::PayloadWrite(error.to_string())
    } else {
        InvokeError::ResponseCodeRead(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Transport;
    use super::*;
    use crate::transport::TlsVersion;

    fn open(url: &str, config: &InvokerConfig) -> Result<Box<dyn Connection>, InvokeError> {
        let url = Url::parse(url).unwrap();
        HttpTransport.open(&url, config)
    }

    #[test]
    fn test_round_trip_get() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("pong")
            .create();

        let url = format!("{}/ping", server.url());
        let mut conn = open(&url, &InvokerConfig::default()).unwrap();
        conn.set_method(HttpMethod::Get).unwrap();
        assert_eq!(conn.read_status().unwrap(), 200);
        assert_eq!(conn.read_body().unwrap(), "pong");
        conn.close();

        mock.assert();
    }

    #[test]
    fn test_written_body_promotes_get_to_post() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/submit")
            .match_body("x=1")
            .with_status(200)
            .create();

        let url = format!("{}/submit", server.url());
        let mut conn = open(&url, &InvokerConfig::default()).unwrap();
        conn.set_method(HttpMethod::Get).unwrap();
        conn.write_payload(b"x=1").unwrap();
        assert_eq!(conn.read_status().unwrap(), 200);
        conn.close();

        mock.assert();
    }

    #[test]
    fn test_status_message_is_canonical_reason() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing").with_status(404).create();

        let url = format!("{}/missing", server.url());
        let mut conn = open(&url, &InvokerConfig::default()).unwrap();
        conn.set_method(HttpMethod::Get).unwrap();
        assert_eq!(conn.read_status().unwrap(), 404);
        assert_eq!(conn.read_status_message().unwrap(), "Not Found");
        conn.close();
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/ok").with_status(200).create();

        let url = format!("{}/ok", server.url());
        let mut conn = open(&url, &InvokerConfig::default()).unwrap();
        conn.set_method(HttpMethod::Get).unwrap();
        conn.set_header("not a header name", "value");
        conn.set_header("X-Valid", "yes");
        assert_eq!(conn.read_status().unwrap(), 200);
        conn.close();

        mock.assert();
    }

    #[test]
    fn test_connection_refused_classified_as_connection_open() {
        // Port 1 is never bound in the test environment.
        let mut conn = open("http://127.0.0.1:1/", &InvokerConfig::default()).unwrap();
        conn.set_method(HttpMethod::Get).unwrap();
        let err = conn.read_status().unwrap_err();
        assert!(matches!(err, InvokeError::ConnectionOpen(_)), "{:?}", err);
        conn.close();
    }

    #[test]
    fn test_insecure_profile_rejects_default_tls_version() {
        let config = InvokerConfig {
            allow_insecure_tls: true,
            ..InvokerConfig::default()
        };
        let err = open("https://example.test/", &config).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::InvalidTlsVersion(TlsVersion::Tls1_1)
        ));
    }

    #[test]
    fn test_insecure_profile_builds_with_tls12() {
        let config = InvokerConfig {
            allow_insecure_tls: true,
            forced_tls_version: TlsVersion::Tls1_2,
            ..InvokerConfig::default()
        };
        assert!(open("https://example.test/", &config).is_ok());
    }

    #[test]
    fn test_insecure_profile_ignored_for_plain_http() {
        // The TLS profile only applies to https; TLSv1.1 must not be
        // rejected for an http URL.
        let config = InvokerConfig {
            allow_insecure_tls: true,
            ..InvokerConfig::default()
        };
        assert!(open("http://example.test/", &config).is_ok());
    }

    #[test]
    fn test_reads_after_close_fail() {
        let mut conn = open("http://example.test/", &InvokerConfig::default()).unwrap();
        conn.close();
        assert!(matches!(
            conn.read_status(),
            Err(InvokeError::ResponseCodeRead(_))
        ));
    }
}
