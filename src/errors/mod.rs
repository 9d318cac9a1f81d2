//! Error types and error handling for the parser.
//!
//! This module defines the error types used throughout tokenizing and
//! parsing. It includes:
//!
//! - Error structures with source span information
//! - Specific error variants for every way a parse can fail
//! - Error names and suggestions for diagnostics

pub mod errors;
