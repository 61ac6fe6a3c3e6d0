use std::time::Duration;

use crate::transport::TlsVersion;

/// Configuration for a `RequestInvoker`.
///
/// The default configuration is the plain profile: certificates are
/// verified, success is status 200 exactly, and no timeouts apply.
#[derive(Debug, Clone, Default)]
pub struct InvokerConfig {
    /// Trust any server certificate and pin the TLS version for `https`
    /// targets. Off by default; only enable against controlled test
    /// environments. Also widens the success range to [200, 300).
    pub allow_insecure_tls: bool,

    /// Protocol version pinned when `allow_insecure_tls` is active.
    pub forced_tls_version: TlsVersion,

    /// Connection-establishment timeout. No limit when `None`.
    pub connect_timeout: Option<Duration>,

    /// Whole-round-trip timeout. No limit when `None`.
    pub read_timeout: Option<Duration>,
}

impl InvokerConfig {
    /// Whether `code` counts as a success response. The plain profile
    /// accepts 200 exactly; the permissive profile accepts any 2xx.
    pub fn is_success(&self, code: u16) -> bool {
        if self.allow_insecure_tls {
            (200..300).contains(&code)
        } else {
            code == 200
        }
    }
}
