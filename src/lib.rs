//! Itemprop: typed property creation across provider-backed namespaces
//!
//! Creates a named, optionally typed property on items of a hierarchical
//! namespace (registry hives, filesystem trees, ...) through the provider that
//! owns each item. Batches keep going past per-path failures, and property-type
//! completion adapts to the provider behind the paths being typed.

pub mod batch;
pub mod cli;
pub mod completion;
pub mod config;
pub mod dynamic_params;
pub mod error;
pub mod logging;
pub mod namespace;
pub mod types;
