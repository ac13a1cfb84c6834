//! # Vela Core
//!
//! Core types and error definitions for Vela service discovery.
//! This crate provides the foundational abstractions used across all
//! layers: service identifiers, instance snapshots, and the unified
//! error type.

pub mod error;
pub mod id;
pub mod instance;
pub mod result;

pub use error::*;
pub use id::*;
pub use instance::*;
pub use result::*;
