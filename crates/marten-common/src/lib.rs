//! Common utilities for the marten template parser.
//!
//! This crate provides shared infrastructure used by the parser front ends:
//! - **Warning System** - deduplicated, colored terminal output for parse
//!   diagnostics

pub mod warning;
