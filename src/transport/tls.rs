use std::fmt;

/// TLS protocol version pinned by the permissive profile.
///
/// The default is `Tls1_1`, the version the permissive profile has always
/// forced. The rustls backend only negotiates 1.2 and 1.3, so the default
/// fails with `InvalidTlsVersion` unless reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVersion {
    Tls1_0,
    #[default]
    Tls1_1,
    Tls1_2,
    Tls1_3,
}

impl TlsVersion {
    /// The protocol name as negotiated on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsVersion::Tls1_0 => "TLSv1",
            TlsVersion::Tls1_1 => "TLSv1.1",
            TlsVersion::Tls1_2 => "TLSv1.2",
            TlsVersion::Tls1_3 => "TLSv1.3",
        }
    }

    /// Whether the TLS backend can negotiate this version. rustls dropped
    /// protocols below 1.2.
    pub fn runtime_supported(&self) -> bool {
        matches!(self, TlsVersion::Tls1_2 | TlsVersion::Tls1_3)
    }

    pub(crate) fn as_reqwest(&self) -> reqwest::tls::Version {
        match self {
            TlsVersion::Tls1_0 => reqwest::tls::Version::TLS_1_0,
            TlsVersion::Tls1_1 => reqwest::tls::Version::TLS_1_1,
            TlsVersion::Tls1_2 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::Tls1_3 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
