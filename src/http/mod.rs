//! HTTP module
//!
//! GraphQL request execution over `reqwest`.
//!
//! # Features
//!
//! - **Single attempt**: each call is one POST; retry policy belongs to the paginator
//! - **Structured faults**: non-2xx statuses become `Error::HttpStatus`
//! - **GraphQL envelope**: `data` / `errors` decoding with shape checks
//! - **Rate ceiling**: optional token bucket using governor

mod client;
mod rate_limit;

pub use client::{GraphQLClient, GraphQLResponse, HttpClientConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
