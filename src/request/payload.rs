/// Content type of a request payload.
///
/// Supplying a payload type is what triggers a body write; the mapped MIME
/// string becomes the `Content-Type` header of the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadType {
    Json,
    Xml,
    Html,
}

impl PayloadType {
    /// The `Content-Type` header value for this payload type.
    pub fn content_type(&self) -> &'static str {
        match self {
            PayloadType::Json => "application/json",
            PayloadType::Xml => "application/xml",
            PayloadType::Html => "text/html",
        }
    }
}
