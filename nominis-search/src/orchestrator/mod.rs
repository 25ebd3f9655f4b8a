//! Search orchestrator: token, upstream call, normalisation, diacritic fallback.
//!
//! A query runs once with the caller's text. When that yields no records
//! and the text carries diacritics, it runs exactly once more with them
//! stripped.

pub mod diacritics;
pub mod search;
