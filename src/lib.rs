//! Text transforms behind a set of editor commands.
//!
//! The centerpiece is [`inline_macro_args`], which rewrites a Rust format
//! macro call so that its positional arguments live inside the format string:
//!
//! ```
//! assert_eq!(
//!     kmacros::inline_macro_args(r#"println!("{} is {}", name, age);"#),
//!     r#"println!("{name} is {age}");"#
//! );
//! ```
//!
//! Around it sit smaller transforms, each a plain function over a string:
//! - [`comments`]: comment and blank-line stripping
//! - [`links`]: markdown link lists from file names
//! - [`calc`]: in-place arithmetic and boolean flipping on a line
//! - [`html`]: cloning the element under a cursor
//!
//! # Architecture
//!
//! The inliner works in three phases:
//! 1. **Detection**: a scanner finds the macro call, its literal and its
//!    balanced argument tail (`parsing`)
//! 2. **Tokenization**: the literal is split into text and placeholders with
//!    nom (`tokenization`)
//! 3. **Rewriting**: placeholder passes consume arguments, leftover
//!    positional references are renumbered and the call is reassembled
//!    (`inline`)
//!
//! # Guarantees
//!
//! - The inliner is total: anything it does not understand comes back
//!   unchanged, so it never reports an error.
//! - Arguments are conserved: each one ends up either inside a placeholder
//!   or in the trailing argument list.
//! - Running it twice gives the same result as running it once.
//!
//! # Limits
//!
//! - **Format strings**: maximum 10,000 bytes
//! - **Tokens**: maximum 1,024 per format string
//! - **Arguments**: maximum 256 per call
//!
//! Inputs beyond a limit are returned unchanged.

#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

// ============================================================================
// Module Organization
// ============================================================================

pub mod calc;
pub mod comments;
pub mod config;
mod constants;
pub mod error;
pub mod html;
mod inline;
pub mod links;
mod parsing;
mod tokenization;
mod types;
mod validation;

#[cfg(test)]
mod examples;

// ============================================================================
// Re-exports for Public API
// ============================================================================

pub use comments::{StripOptions, Stripped};
pub use config::Settings;
pub use error::{Error, Result};
pub use inline::inline_macro_args;
pub use links::LinkTemplate;
