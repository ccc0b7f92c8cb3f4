// src/ingest/providers/mod.rs
pub mod ntis;

pub use ntis::NtisProvider;
