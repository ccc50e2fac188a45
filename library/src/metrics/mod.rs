//! Lightweight metrics collection with Prometheus text rendering
//!
//! Services submit [`MetricsEntries`](MetricsEntry) to a shared
//! [`MetricsRegistry`] which aggregates them into counters and histograms.
//! The registry renders its state in the
//! [Prometheus text exposition format](https://prometheus.io/docs/instrumenting/exposition_formats/)
//! for consumption by an HTTP scrape endpoint.

mod entry;
mod registry;
mod render;

pub use entry::*;
pub use registry::*;
pub use render::*;
