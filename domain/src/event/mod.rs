//! Notifications published by the pipeline

mod order;

pub use order::*;
