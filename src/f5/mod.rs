//! F5 iControl REST interaction module
//!
//! Authentication, HTTP transport and the per-invocation client.
//!
//! # Module Structure
//!
//! - [`auth`] - Token login and the basic-auth credential check
//! - [`client`] - Session-bound client and ASM URL builders
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use f5asm::f5::client::AsmClient;
//!
//! async fn example(settings: &ClientSettings) -> anyhow::Result<()> {
//!     let client = AsmClient::connect(settings).await?;
//!     let policies = client.get(&client.policies_url()).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
