//! Shared foundational types used across the svstyle checker.
//!
//! This crate provides interned identifiers for signal, port, and module
//! names, and content hashing for source files.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
