//! Presentation transports
//!
//! The terminal is the only view; it renders values produced by the core.

pub mod cli;
