//! REST client for the IMS backend.
//!
//! Requests go through an [`HttpTransport`] (libcurl by default), carry the
//! bearer token from the persisted session, and handle 401s according to the
//! [`AuthMode`]: the main app refreshes its token pair once, the
//! customer/vendor portal sends the user back to login.

mod client;
mod error;
mod query;
mod transport;

pub use client::{ApiClient, AuthMode, LoginResponse, TokenPair};
pub use error::{ApiError, TransportError};
pub use query::query_pairs;
pub use transport::{CurlTransport, HttpRequest, HttpResponse, HttpTransport, Method};
