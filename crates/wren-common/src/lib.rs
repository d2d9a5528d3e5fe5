//! Common utilities for the wren pipeline.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Warning System** - deduplicated, colored stderr diagnostics for
//!   malformed markup and unrecognized style values

pub mod warning;
