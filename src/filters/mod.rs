//! Filters deciding which history entries are allowed into storage

pub mod sensitive;

pub use sensitive::{DEFAULT_SENSITIVE_TERMS, SensitiveFilter, is_sensitive};
