// parasempre-api: async Rust client for the parasempre guest-directory HTTP API.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{DirectoryClient, IDENTITY_HEADER};
pub use error::Error;
pub use transport::TransportConfig;
