//! Blocking client for the Square Connect v1/v2 commerce API.
//!
//! # Overview
//! Builds `HttpRequest` values and handles `HttpResponse` values as plain
//! data. A `Transport` performs the round-trip in between; `UreqTransport` is
//! the default one, and any closure with the right signature works too.
//!
//! # Design
//! - `ClientConfig` carries the location id, access token and debug switch,
//!   and never changes after the client is built.
//! - `RequestBuilder` turns method + path + query into an authorized request.
//! - `ResponseHandler` accepts only status 200; everything else becomes a
//!   `NormalizedError`, and transport failures pass through unchanged.
//! - `SquareClient` exposes one method per endpoint in `Endpoint`, each
//!   returning exactly one `SquareResult`.
//! - `receipt::extract` pulls the card AID and cardholder name from a
//!   receipt page.
//!
//! ```no_run
//! use square_connect::{ClientConfig, SquareClient};
//!
//! let config = ClientConfig::new("LOCATION_ID", "ACCESS_TOKEN");
//! let client = SquareClient::with_default_transport(config);
//! let items = client.list_items()?;
//! println!("{items}");
//! # Ok::<(), square_connect::SquareError>(())
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod receipt;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use client::SquareClient;
pub use config::{ClientConfig, API_HOST};
pub use endpoints::Endpoint;
pub use error::{NormalizedError, SquareError, SquareResult};
pub use http::{FormPart, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use request::RequestBuilder;
pub use response::ResponseHandler;
pub use transport::{Transport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{QueryParams, ReceiptInfo};
