//! Request value types: HTTP methods, payload content types, header maps.

mod method;
mod payload;

pub use method::HttpMethod;
pub use payload::PayloadType;

use std::collections::HashMap;

/// Caller-supplied request headers, keyed by header name.
///
/// A `None` value means the header is skipped when the request is prepared.
/// `User-Agent` is always overwritten by the invoker after these are applied,
/// so supplying it here has no effect.
pub type RequestHeaders = HashMap<String, Option<String>>;
