//! OpenSky Network sample sources.
//!
//! Two providers feed the same [`skywatch_core::StateSample`] stream: the
//! live REST snapshot endpoint and the historical Trino warehouse. The core
//! does not care which one a sample came from.

mod client;
mod error;
mod trino;

pub use client::OpenSkyClient;
pub use error::SourceError;
pub use trino::{hour_range, TrinoClient};
