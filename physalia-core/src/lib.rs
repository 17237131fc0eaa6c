//! Shared primitives, traits, and utilities for the Physalia cheminformatics ecosystem.
//!
//! `physalia-core` provides the foundation the other Physalia crates build on:
//!
//! - **Error types** — [`Error`] and [`Result`] for structured error handling
//! - **Traits** — Core abstractions like [`Annotated`], [`Summarizable`], [`ContentAddressable`]
//! - **Hashing** — SHA-256 content addressing for data integrity

pub mod error;
pub mod hash;
pub mod traits;

pub use error::{Error, Result};
pub use traits::*;
