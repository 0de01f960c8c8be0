// shelterly-api: Async Rust client for the Shelterly REST backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::BackendClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
