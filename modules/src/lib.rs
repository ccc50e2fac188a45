//! Runnable modules each bundling multiple services and providing a unified configuration

#![deny(missing_docs)]

pub mod options;

pub mod metrics;
pub mod notifier;
pub mod processor;
pub mod producer;
