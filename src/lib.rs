//! Planning layer of a synthetic benchmark workload generator.
//!
//! Parses a small line-oriented configuration describing the relative
//! frequencies of insert/modify/search operations and, within each kind,
//! of the named query templates, and builds an immutable index that maps
//! uniform percentage draws in (0, 100] to templates in O(log n).
//!
//! The crate only decides *which* template the Nth generated operation
//! should use. Executing queries and generating attribute values are the
//! job of the downstream generator.

pub mod config;
pub mod error;
pub mod template;
