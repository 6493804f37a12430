//! Escaping for values spliced into request paths and query strings.
//!
//! Only bytes that would change the structure of the URL (or are whitespace or
//! control characters) are escaped. `%` is left alone so values that are
//! already percent-encoded pass through without being encoded twice.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

const STRUCTURAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// A single path segment: `/` must not split it.
const PATH_SEGMENT: &AsciiSet = &STRUCTURAL.add(b'/');

/// A query value: `/` and `:` are legal, parameter delimiters are not.
const QUERY_VALUE: &AsciiSet = &STRUCTURAL.add(b'&').add(b'=').add(b'+');

pub(crate) fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

pub(crate) fn query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
