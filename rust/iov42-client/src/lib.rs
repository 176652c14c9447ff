//! HTTP client for the iov42 platform.
//!
//! A [`Client`] is a session for one identity: it assembles signed writes
//! with `iov42-protocol`, submits them through a [`RequestTransport`] that
//! follows the platform's polling redirects, and delays the first read
//! after a write until the platform has likely replicated it.
//!
//! ```no_run
//! # async fn run(identity: iov42_protocol::Identity) -> Result<(), iov42_client::TransportError> {
//! use iov42_client::{Client, ClientConfig};
//!
//! let mut client = Client::new(ClientConfig::new("https://node.example.com/api/v1"), identity)?;
//! let issued = client.issue_identity().await?;
//! assert!(issued.success);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod response;
mod transport;

pub use client::*;
pub use config::*;
pub use error::*;
pub use response::*;
pub use transport::*;
