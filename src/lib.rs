//! Rust client for the Raven Tools reporting API.
//!
//! Raven Tools exposes every capability as a named method behind a
//! single query-string endpoint, answering in JSON or XML. This crate
//! maps each method to a typed call, validates the per-method field
//! contract before anything touches the network, and hands back the
//! decoded response in exactly the shape the service produced.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use raventools::Client;
//!
//! fn main() -> Result<(), raventools::Error> {
//!     let client = Client::builder("your-api-key").build()?;
//!
//!     let domains = client.list_domains()?;
//!     if let Some(list) = domains.as_json() {
//!         println!("{list:#?}");
//!     }
//!
//!     let rank = client.get_rank(
//!         "www.example.com",
//!         "example keyword",
//!         "2011-01-01",
//!         "2011-01-31",
//!         "all",
//!     )?;
//!     println!("{:?}", rank.as_json());
//!     Ok(())
//! }
//! ```
//!
//! Responses keep the wire shape: list operations decode to JSON
//! arrays, keyed results to objects, and clients configured for XML
//! receive the parsed `<Raven>` document instead. Inject a
//! [`Transport`] to run against canned payloads without a network.

mod client;
mod date;
mod error;
mod method;
mod request;
mod response;
mod transport;
mod types;
pub mod xml;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use method::{fields, Descriptor, Operation};
pub use request::{build_url, FieldValue, Params};
pub use response::{decode, ApiResponse, Format};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::{Link, LinkBatch};
pub use xml::{XmlDocument, XmlElement};

/// Generation of the remote API this client targets.
pub const API_VERSION: &str = "1.0";
