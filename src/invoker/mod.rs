//! The request invoker: one linear request/response round trip per call.

mod client;
mod config;

pub use client::RequestInvoker;
pub use config::InvokerConfig;
