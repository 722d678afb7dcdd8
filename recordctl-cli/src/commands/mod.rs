//! Command implementations for recordctl CLI

pub mod serve;

pub use serve::run_serve;
