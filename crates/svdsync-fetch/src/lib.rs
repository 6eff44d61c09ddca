//! HTTP retrieval for the sync pipeline.
//!
//! - [`HttpClient`] - streaming GET abstraction, implemented by [`ReqwestClient`]
//! - [`Fetcher`] - collects small bodies and stages archives on disk
//! - [`FetchOptions`] - request headers sent with every request
//!
//! No retries and no timeouts: a failed request fails the caller.

mod data;
mod error;
mod fetcher;
mod http;

pub use data::{FetchOptions, browser_headers};
pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
