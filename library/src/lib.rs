//! Project agnostic messaging and observability building blocks
//!
//! Everything in this crate could, in principle, be lifted into its own
//! standalone library. Domain specific structures live in the `domain`
//! crate and runtime plumbing in the `harness` crate.

#![deny(missing_docs)]

pub mod communication;
pub mod helpers;
pub mod metrics;

/// Generic error type
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result with no value and a [`BoxedError`]
pub type EmptyResult = Result<(), BoxedError>;
