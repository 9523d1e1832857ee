//! REST client for the producoes dashboard backend.
//!
//! All endpoints are plain GETs under a configured base URL. Filters become
//! query parameters; responses are decoded into typed structs, so a body of
//! the wrong shape surfaces as [`ApiError::Decode`] rather than bad data.

mod client;
mod error;
mod query;
mod types;

pub use client::{ApiConfig, DEFAULT_API_URL, ProducoesClient, decode_body};
pub use error::ApiError;
pub use query::{ProductionFilters, QueryParams, StatsFilters};
pub use types::{ChartStat, Paginated, ProductionRecord};
