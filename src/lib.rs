//! Synchronous HTTP(S) request invoker.
//!
//! A [`RequestInvoker`] is built once per call target with a URL and an HTTP
//! method, and performs one full request/response round trip per
//! [`RequestInvoker::execute`] call: open a connection, set the method, apply
//! headers, optionally write a payload, read the status, and return the body
//! as a string or a typed [`InvokeError`] naming the failing phase.
//!
//! All I/O goes through the [`transport::Transport`] seam, so the core
//! sequence can be tested without a network. The production transport runs on
//! a blocking reqwest client and supports an explicit, off-by-default
//! permissive TLS profile for controlled test environments.

pub mod error;
pub mod invoker;
pub mod request;
pub mod transport;

pub use error::InvokeError;
pub use invoker::{InvokerConfig, RequestInvoker};
pub use request::{HttpMethod, PayloadType, RequestHeaders};
pub use transport::{Connection, HttpTransport, TlsVersion, Transport};
