//! Input limits and capacity constants for the text transforms.
//!
//! This module centralizes the limits that keep every transform bounded by
//! its input and the allocation hints used on the hot paths.

// ============================================================================
// Recognized Macros
// ============================================================================

/// Formatting macros whose first argument may be a format string literal.
pub const FORMAT_MACROS: &[&str] = &[
    "format",
    "print",
    "println",
    "eprint",
    "eprintln",
    "write",
    "writeln",
    "format_args",
    "panic",
    "unreachable",
    "todo",
    "assert",
    "assert_eq",
    "debug_assert",
    "debug_assert_eq",
];

// ============================================================================
// Input Limits
// ============================================================================

/// Maximum length of a format string in bytes.
///
/// Longer literals are left untouched by the inliner.
pub const MAX_FORMAT_STRING_LEN: usize = 10_000;

/// Maximum number of tokens in a format string.
pub const MAX_TOKENS: usize = 1024;

/// Maximum number of trailing arguments considered for inlining.
pub const MAX_ARGUMENTS: usize = 256;

// ============================================================================
// Memory Pre-Allocation Hints
// ============================================================================

/// Initial capacity hint for the token vector.
///
/// Most format strings have 2-4 tokens, so this avoids initial reallocations.
pub const TOKENS_INITIAL_CAPACITY: usize = 4;

/// Initial capacity hint for the argument list.
pub const ARGUMENTS_INITIAL_CAPACITY: usize = 4;

/// Extra bytes reserved when rebuilding a call, on top of the input length.
///
/// Inlining usually grows the literal by a few identifiers.
pub const REWRITE_EXTRA_CAPACITY: usize = 16;
