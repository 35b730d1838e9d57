//! File output for calculation results.

pub mod export;
