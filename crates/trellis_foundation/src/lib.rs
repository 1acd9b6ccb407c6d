//! Core types for the Trellis rule engine.
//!
//! This crate provides:
//! - [`Fact`] - The capability every asserted value exposes
//! - [`FactKey`] - Unique fact identity within working memory
//! - [`SharedFact`] - Reference-counted fact handle held by the network
//! - [`Token`] - An ordered partial match with content-hash identity
//! - [`AggregateResult`] - Synthetic fact emitted by threshold aggregation
//! - [`Error`] - Error types for rule compilation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod fact;
mod token;

pub use error::{Error, Result};
pub use fact::{AggregateResult, Fact, FactKey, SharedFact};
pub use token::Token;
