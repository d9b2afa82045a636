//! Authentication module
//!
//! Exchanges OAuth2 client credentials for a bearer token.
//!
//! The token is fetched once per execution batch and reused for every
//! request in that batch. There is no refresh: a failed exchange is fatal
//! for the whole batch and surfaces before any item is processed.

mod token;
mod types;

pub use token::TokenProvider;
pub use types::{AccessToken, Credentials, DEFAULT_BASE_URL, DEFAULT_TOKEN_URL};

#[cfg(test)]
mod tests;
