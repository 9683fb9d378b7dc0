//! Foundation types for Babbler.
//!
//! This crate contains the types shared by every Babbler crate: the reply
//! code contract, the bounded reply buffer, canonical reply tokens,
//! configuration, and error types.

pub mod buffer;
pub mod config;
pub mod error;
pub mod reply;
