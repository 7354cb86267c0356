//! pinmap-core
//!
//! Core library for listing GPIO lines together with the physical pin and
//! pin-mux information scraped from vendor debugfs dumps.
//!
//! This crate holds the parsers for the debug-text dialects, the correlator
//! that turns them into per-chip pin tables, the line resolver that matches
//! user-requested lines, and the scan driver tying them to a line metadata
//! provider.
//!
//! All substantive logic lives here so it can be tested without hardware and
//! reused from multiple frontends.

pub mod config;
pub mod correlate;
pub mod diagnostics;
pub mod model;
pub mod parse;
pub mod provider;
pub mod resolve;
pub mod scan;
pub mod sources;
