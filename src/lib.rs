//! joblens - Tech job postings CSV cleaning & summary analysis
//!
//! A linear batch pipeline: raw postings CSV -> cleaner -> cleaned CSV ->
//! analyzer -> summary tables. Each stage returns a fresh table; nothing
//! is mutated in place.

pub mod data;
pub mod report;
pub mod stats;
