//! Inlining of positional format macro arguments.
//!
//! `println!("{0} {}", a, b)` becomes `println!("{a} {b}")`. Arguments that
//! cannot be written inside a placeholder stay behind as trailing positional
//! arguments, and any positional reference left in the literal is renumbered
//! against what remains.

use std::fmt;

use log::{debug, trace};

use crate::constants::{MAX_ARGUMENTS, REWRITE_EXTRA_CAPACITY};
use crate::parsing::{find_macro_call, split_arguments};
use crate::tokenization::{tokenize_format_string, tokenize_spec};
use crate::types::{FormatToken, MacroCall, Placeholder, SpecPiece};
use crate::validation::{is_inlinable_argument, is_word};

/// Rewrite the first formatting macro call in `text` to use inline arguments.
///
/// Total over all inputs: when there is no recognized call, no trailing
/// argument, a malformed literal, or nothing that can be inlined, the input
/// is returned unchanged.
///
/// # Examples
///
/// ```
/// use kmacros::inline_macro_args;
///
/// assert_eq!(
///     inline_macro_args(r#"println!("{0} {1}", x, y);"#),
///     r#"println!("{x} {y}");"#
/// );
/// assert_eq!(
///     inline_macro_args(r#"format!("{}", a, b)"#),
///     r#"format!("{a}", b)"#
/// );
/// ```
pub fn inline_macro_args(text: &str) -> String {
    rewrite(text).unwrap_or_else(|| text.to_owned())
}

fn rewrite(text: &str) -> Option<String> {
    let Some(call) = find_macro_call(text) else {
        trace!("no format macro call found");
        return None;
    };
    let Some(raw_args) = call.raw_args else {
        trace!("`{}!` call has no arguments", call.macro_name);
        return None;
    };

    let arguments = split_arguments(raw_args);
    if arguments.is_empty() {
        trace!("`{}!` call has no arguments", call.macro_name);
        return None;
    }
    if arguments.len() > MAX_ARGUMENTS {
        debug!(
            "`{}!` call has {} arguments, more than the {MAX_ARGUMENTS} considered",
            call.macro_name,
            arguments.len()
        );
        return None;
    }

    let tokens = match tokenize_format_string(call.format_string) {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!("leaving `{}!` call untouched: {err}", call.macro_name);
            return None;
        }
    };

    let mut slots = ArgumentSlots::new(arguments);
    let mut segments: Vec<Segment<'_>> = tokens.into_iter().map(Segment::from).collect();

    inline_indexed(&mut segments, &mut slots);
    inline_width_references(&mut segments, &mut slots);
    inline_implicit(&mut segments, &mut slots);
    rewrite_keyword_aliases(&mut segments);
    strip_verbose_flags(&mut segments);
    inline_precision_references(&mut segments, &mut slots);

    // Alias and verbose rewrites alone leave the call as written.
    if !slots.consumed_any() {
        debug!("no argument of `{}!` call can be inlined", call.macro_name);
        return None;
    }

    resolve_positional_references(&mut segments, &slots);

    let remaining = slots.remaining();
    debug!(
        "inlined {} of {} argument(s) into `{}!` call",
        slots.len() - remaining.len(),
        slots.len(),
        call.macro_name
    );

    Some(assemble(&call, &segments, &remaining))
}

// ============================================================================
// Argument Bookkeeping
// ============================================================================

/// Arguments of one call, with consumed positions emptied.
struct ArgumentSlots<'a> {
    arguments: Vec<&'a str>,
    unused: Vec<Option<&'a str>>,
}

/// Where a positional reference points once inlining is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference<'a> {
    /// The argument is still passed, now at this position.
    Trailing(usize),
    /// The argument was inlined and is referred to by its expression.
    Inlined(&'a str),
}

impl fmt::Display for Reference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Trailing(index) => write!(f, "{index}"),
            Reference::Inlined(expr) => f.write_str(expr),
        }
    }
}

impl<'a> ArgumentSlots<'a> {
    fn new(arguments: Vec<&'a str>) -> Self {
        let unused = arguments.iter().copied().map(Some).collect();
        Self { arguments, unused }
    }

    fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Argument at `index`, consumed or not.
    fn get(&self, index: usize) -> Option<&'a str> {
        self.arguments.get(index).copied()
    }

    /// Argument at `index` if it can be substituted into a placeholder.
    fn inlinable(&self, index: usize) -> Option<&'a str> {
        self.get(index).filter(|arg| is_inlinable_argument(arg))
    }

    fn consume(&mut self, index: usize) {
        if let Some(slot) = self.unused.get_mut(index) {
            *slot = None;
        }
    }

    /// First unconsumed position at or after `from`.
    fn next_unused(&self, from: usize) -> Option<usize> {
        (from..self.unused.len()).find(|&index| self.unused[index].is_some())
    }

    fn first_unused_where(&self, predicate: impl Fn(&str) -> bool) -> Option<usize> {
        self.unused
            .iter()
            .position(|slot| slot.is_some_and(|arg| predicate(arg)))
    }

    fn consumed_any(&self) -> bool {
        self.unused.iter().any(Option::is_none)
    }

    fn remaining(&self) -> Vec<&'a str> {
        self.unused.iter().flatten().copied().collect()
    }

    fn resolve(&self, index: usize) -> Option<Reference<'a>> {
        let slot = self.unused.get(index)?;
        Some(match slot {
            Some(_) => Reference::Trailing(self.unused[..index].iter().flatten().count()),
            None => Reference::Inlined(self.arguments[index]),
        })
    }
}

// ============================================================================
// Rewritable Format String
// ============================================================================

enum Segment<'a> {
    Text(&'a str),
    Placeholder(Slot),
}

/// A placeholder being rewritten.
struct Slot {
    argument: String,
    spec: Option<String>,
    /// The argument part is still the text written in the literal.
    written_argument: bool,
    /// The spec is still the text written in the literal.
    written_spec: bool,
}

impl<'a> From<FormatToken<'a>> for Segment<'a> {
    fn from(token: FormatToken<'a>) -> Self {
        match token {
            FormatToken::Text(text) => Segment::Text(text),
            FormatToken::Placeholder(placeholder) => Segment::Placeholder(Slot::from(placeholder)),
        }
    }
}

impl From<Placeholder<'_>> for Slot {
    fn from(placeholder: Placeholder<'_>) -> Self {
        Self {
            argument: placeholder.argument.to_owned(),
            spec: placeholder.spec.map(str::to_owned),
            written_argument: true,
            written_spec: true,
        }
    }
}

impl Slot {
    fn as_placeholder(&self) -> Placeholder<'_> {
        Placeholder {
            argument: &self.argument,
            spec: self.spec.as_deref(),
        }
    }

    /// Index written in the literal, for `{N}` and `{N:spec}`.
    fn written_index(&self) -> Option<usize> {
        if !self.written_argument {
            return None;
        }
        self.as_placeholder().index()
    }

    fn is_written_implicit(&self) -> bool {
        self.written_argument && self.as_placeholder().is_implicit()
    }

    /// K of `{N:K$}`, when the whole written spec is one positional width reference.
    fn width_reference(&self) -> Option<usize> {
        if !self.written_spec {
            return None;
        }
        match tokenize_spec(self.spec.as_deref()?).as_slice() {
            [SpecPiece::PositionalCount(count)] => Some(*count),
            _ => None,
        }
    }

    fn inline(&mut self, expr: &str) {
        self.argument = expr.to_owned();
        self.written_argument = false;
    }

    fn render_into(&self, out: &mut String) {
        out.push('{');
        out.push_str(&self.argument);
        if let Some(spec) = &self.spec {
            out.push(':');
            out.push_str(spec);
        }
        out.push('}');
    }
}

fn slots_mut<'s, 'a>(segments: &'s mut [Segment<'a>]) -> impl Iterator<Item = &'s mut Slot> {
    segments.iter_mut().filter_map(|segment| match segment {
        Segment::Placeholder(slot) => Some(slot),
        Segment::Text(_) => None,
    })
}

// ============================================================================
// Passes
// ============================================================================

/// `{N}` / `{N:spec}` → `{argN:spec}`.
fn inline_indexed(segments: &mut [Segment<'_>], slots: &mut ArgumentSlots<'_>) {
    for slot in slots_mut(segments) {
        if slot.width_reference().is_some() {
            continue;
        }
        let Some(index) = slot.written_index() else {
            continue;
        };
        if let Some(expr) = slots.inlinable(index) {
            slots.consume(index);
            slot.inline(expr);
        }
    }
}

/// `{N:K$}` → `{argN:argK$}`.
///
/// When argK is not inlinable only argN is inlined; the `K$` reference is
/// renumbered with the others at the end.
fn inline_width_references(segments: &mut [Segment<'_>], slots: &mut ArgumentSlots<'_>) {
    for slot in slots_mut(segments) {
        let Some(width_index) = slot.width_reference() else {
            continue;
        };
        let Some(index) = slot.written_index() else {
            continue;
        };
        let Some(expr) = slots.inlinable(index) else {
            continue;
        };
        slots.consume(index);
        slot.inline(expr);

        if let Some(width) = slots.inlinable(width_index) {
            slots.consume(width_index);
            slot.spec = Some(format!("{width}$"));
            slot.written_spec = false;
        }
    }
}

/// `{}` / `{:spec}` → `{arg:spec}` with arguments taken in list order.
///
/// A placeholder whose turn falls on a non-inlinable argument stays
/// positional and that argument stays trailing. Once the arguments run out
/// the remaining implicit placeholders are left as written, so a literal that
/// mixes `{}` with indices can come out with an implicit `{}` and no argument
/// for it: `println!("{} {0}", a)` becomes `println!("{} {a}")`.
fn inline_implicit(segments: &mut [Segment<'_>], slots: &mut ArgumentSlots<'_>) {
    let mut cursor = 0;
    for slot in slots_mut(segments) {
        if !slot.is_written_implicit() {
            continue;
        }
        let Some(index) = slots.next_unused(cursor) else {
            break;
        };
        cursor = index + 1;
        if let Some(expr) = slots.inlinable(index) {
            slots.consume(index);
            slot.inline(expr);
        }
    }
}

/// `{name=alias:spec}` → `{alias:spec}`.
fn rewrite_keyword_aliases(segments: &mut [Segment<'_>]) {
    for slot in slots_mut(segments) {
        if !slot.written_argument {
            continue;
        }
        let Some((name, alias)) = slot.argument.split_once('=') else {
            continue;
        };
        let alias = alias.trim_start();
        if is_word(name.trim_end()) && is_word(alias) {
            slot.argument = alias.to_owned();
        }
    }
}

/// `{namev:spec}` → `{name:spec}`.
fn strip_verbose_flags(segments: &mut [Segment<'_>]) {
    for slot in slots_mut(segments) {
        if !slot.written_argument || slot.spec.is_none() {
            continue;
        }
        let Some(name) = slot.argument.strip_suffix('v') else {
            continue;
        };
        if is_word(name) {
            let len = name.len();
            slot.argument.truncate(len);
        }
    }
}

/// `{name:.*}` → `{name:.prec$}` with the first unused argument other than `name`.
fn inline_precision_references(segments: &mut [Segment<'_>], slots: &mut ArgumentSlots<'_>) {
    for slot in slots_mut(segments) {
        if slot.spec.as_deref() != Some(".*") || !is_word(&slot.argument) {
            continue;
        }
        let Some(index) = slots.first_unused_where(|arg| arg != slot.argument) else {
            continue;
        };
        let Some(precision) = slots.inlinable(index) else {
            continue;
        };

        slots.consume(index);
        slot.spec = Some(format!(".{precision}$"));
        slot.written_spec = false;
    }
}

/// Renumber positional references that survived inlining.
fn resolve_positional_references(segments: &mut [Segment<'_>], slots: &ArgumentSlots<'_>) {
    for slot in slots_mut(segments) {
        if let Some(reference) = slot.written_index().and_then(|index| slots.resolve(index)) {
            slot.argument = reference.to_string();
        }

        if !slot.written_spec {
            continue;
        }
        let Some(spec) = slot.spec.as_deref() else {
            continue;
        };
        let pieces = tokenize_spec(spec);
        if !pieces
            .iter()
            .any(|piece| matches!(piece, SpecPiece::PositionalCount(_)))
        {
            continue;
        }

        let mut resolved = String::with_capacity(spec.len());
        for piece in &pieces {
            match *piece {
                SpecPiece::Literal(text) => resolved.push_str(text),
                SpecPiece::PositionalCount(index) => {
                    match slots.resolve(index) {
                        Some(reference) => resolved.push_str(&reference.to_string()),
                        None => resolved.push_str(&index.to_string()),
                    }
                    resolved.push('$');
                }
            }
        }
        slot.spec = Some(resolved);
    }
}

// ============================================================================
// Reassembly
// ============================================================================

fn assemble(call: &MacroCall<'_>, segments: &[Segment<'_>], remaining: &[&str]) -> String {
    let mut out = String::with_capacity(
        call.prefix.len()
            + call.macro_name.len()
            + call.format_string.len()
            + call.suffix.len()
            + REWRITE_EXTRA_CAPACITY,
    );

    out.push_str(call.prefix);
    out.push_str(call.macro_name);
    out.push_str("!(");
    if call.is_multiline {
        out.push_str("\n    ");
    }

    out.push(call.quote);
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(slot) => slot.render_into(&mut out),
        }
    }
    out.push(call.quote);

    for arg in remaining {
        out.push_str(", ");
        out.push_str(arg);
    }

    if call.is_multiline {
        out.push('\n');
    }
    out.push(')');
    out.push_str(call.suffix);
    out
}
