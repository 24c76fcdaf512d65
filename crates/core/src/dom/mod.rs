// ABOUTME: DOM traversal for turning article HTML into flat narration text.
// ABOUTME: Wraps scraper's HTML document tree; see convert for the structural rewrite rules.

//! DOM utilities for HTML-to-text conversion.
//!
//! The source tree is never mutated: the converter walks it once, depth first,
//! and writes text fragments and markers into a new buffer.

pub mod convert;

pub use convert::{convert, convert_with};
