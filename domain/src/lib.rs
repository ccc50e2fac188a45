//! Domain structures of the order pipeline
//!
//! Contains the [`Order`] aggregate, the notifications derived from it and
//! the producer-side template catalogue. Everything in here is plain data;
//! transport and runtime concerns live in the `library` and `harness` crates.

#![deny(missing_docs)]

pub mod event;

mod confirmation;
mod order;

pub use confirmation::*;
pub use order::*;
