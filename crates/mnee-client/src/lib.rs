#![deny(missing_docs)]

//! # mnee-client
//!
//! Async client for the MNEE cosigner API: a cached system configuration,
//! transfers built and signed locally then cosigned remotely, ticket
//! polling, and read endpoints for outputs, balances and history.
//!
//! # Example
//!
//! ```no_run
//! use mnee_client::{ClientConfig, Environment, Mnee};
//! use mnee_tokens::TransferRecipient;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), mnee_tokens::MneeError> {
//! let mnee = Mnee::new(ClientConfig::new(Environment::Sandbox, "my-token"))?;
//! let cancel = CancellationToken::new();
//!
//! let recipients = [TransferRecipient::new(1_000, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH")];
//! let ticket_id = mnee
//!     .transfer_async(&["L1...wif"], &recipients, None, None, &cancel)
//!     .await?;
//! let ticket = mnee
//!     .poll_ticket(&ticket_id, std::time::Duration::from_secs(2), &cancel)
//!     .await?;
//! println!("{:?}", ticket.status);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod http;


pub use cache::ConfigCache;
pub use client::Mnee;
pub use config::{ClientConfig, Environment};
pub use http::HttpLedger;
