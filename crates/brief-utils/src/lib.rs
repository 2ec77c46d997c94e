//! Shared utilities for brief-rs
//!
//! This crate provides common functionality used across the brief-rs
//! workspace, currently logging setup.

pub mod logging;

pub use logging::init_tracing;
