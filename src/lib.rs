//! Trellis - Incremental forward-chaining rule engine
//!
//! This crate re-exports all layers of the Trellis system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: trellis_engine     — Agenda, rule model, network compiler
//! Layer 1: trellis_network    — Matching nodes and memories
//! Layer 0: trellis_foundation — Core types (Fact, Token, Error)
//! ```

pub use trellis_engine as engine;
pub use trellis_foundation as foundation;
pub use trellis_network as network;
