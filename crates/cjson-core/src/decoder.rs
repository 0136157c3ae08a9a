//! Recursive-descent decoder: converts JSON text into a [`Value`] tree.
//!
//! One function per grammar production, all driven by a shared [`Scanner`]:
//!
//! - `parse_value` dispatches on the lookahead byte
//! - `parse_object` / `parse_array` recurse back into `parse_value`
//! - `parse_string`, `parse_number`, `parse_keyword` produce leaves
//!
//! # Deliberate leniency
//!
//! The decoder lexes JSON but does not fully validate it:
//!
//! - **Escapes are not decoded.** A backslash only protects the byte after it
//!   from ending the string; both bytes stay in the output verbatim, so
//!   `"a\"b"` decodes to the four characters `a\"b`.
//! - **Numerals follow the C floating-literal grammar**, not the JSON one:
//!   `1.`, `-.5` and `01` are accepted. Only its decimal form is taken: hex
//!   literals (`0x10`) and `inf` / `nan` spellings, which a C `strtod` would
//!   also read after a leading `-`, are syntax errors here.
//! - **Integral numerals become integers.** Anything whose double value is a
//!   whole number inside the `i64` range decodes as [`Value::Integer`], so
//!   `3.0` and `2e3` come back as `3` and `2000`.
//! - **Duplicate keys**: the last value wins; the key keeps its first position.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::scanner::Scanner;
use crate::value::{Map, Value};

/// Decode exactly one JSON value from `input`, allowing only whitespace after it.
///
/// The buffer length is authoritative; no terminator is expected. On any error
/// the partially built tree is dropped and only the error is returned.
pub fn decode(input: &[u8]) -> Result<Value> {
    trace!(len = input.len(), "decoding");
    let mut sc = Scanner::new(input);
    let result = parse_document(&mut sc);
    if let Err(e) = &result {
        debug!(kind = ?e.kind(), offset = ?e.offset(), "decode failed: {e}");
    }
    result
}

/// [`decode`] over the bytes of a string slice.
pub fn decode_str(input: &str) -> Result<Value> {
    decode(input.as_bytes())
}

/// Top-level rule: one value, then whitespace to the end of the buffer.
fn parse_document(sc: &mut Scanner<'_>) -> Result<Value> {
    let value = parse_value(sc)?;
    sc.skip_whitespace();
    if !sc.is_at_end() {
        return Err(Error::TrailingData { offset: sc.pos() });
    }
    Ok(value)
}

fn parse_value(sc: &mut Scanner<'_>) -> Result<Value> {
    sc.skip_whitespace();
    match sc.peek() {
        Some(b'{') => parse_object(sc),
        Some(b'[') => parse_array(sc),
        Some(b'"') => parse_string(sc).map(Value::String),
        Some(b'-' | b'0'..=b'9') => parse_number(sc),
        _ => match parse_keyword(sc) {
            Some(value) => Ok(value),
            None => Err(unexpected(sc, "expected object or value")),
        },
    }
}

fn parse_object(sc: &mut Scanner<'_>) -> Result<Value> {
    expect(sc, b'{')?;
    let mut map = Map::new();

    sc.skip_whitespace();
    if sc.eat(b'}') {
        return Ok(Value::Object(map));
    }

    loop {
        if sc.peek() != Some(b'"') {
            return Err(unexpected(sc, "expected string key"));
        }
        let key = parse_string(sc)?;

        sc.skip_whitespace();
        if !sc.eat(b':') {
            return Err(unexpected(sc, "expected ':' after object key"));
        }

        sc.skip_whitespace();
        let value = parse_value(sc)?;
        map.insert(key, value);

        sc.skip_whitespace();
        match sc.peek() {
            Some(b'}') => {
                sc.bump(1);
                return Ok(Value::Object(map));
            }
            Some(b',') => {
                sc.bump(1);
                sc.skip_whitespace();
            }
            _ => return Err(unexpected(sc, "expected ',' or '}'")),
        }
    }
}

fn parse_array(sc: &mut Scanner<'_>) -> Result<Value> {
    expect(sc, b'[')?;
    let mut items = Vec::new();

    sc.skip_whitespace();
    if sc.eat(b']') {
        return Ok(Value::Array(items));
    }

    loop {
        items.push(parse_value(sc)?);

        sc.skip_whitespace();
        match sc.peek() {
            Some(b']') => {
                sc.bump(1);
                return Ok(Value::Array(items));
            }
            Some(b',') => {
                sc.bump(1);
                sc.skip_whitespace();
            }
            _ => return Err(unexpected(sc, "expected ',' or ']'")),
        }
    }
}

/// Scan a quoted string and return its raw contents. Escape sequences are
/// skipped over, never translated.
fn parse_string(sc: &mut Scanner<'_>) -> Result<String> {
    let open = sc.pos();
    expect(sc, b'"')?;
    let start = sc.pos();

    loop {
        match sc.peek() {
            None => return Err(Error::syntax(open, "unterminated string")),
            Some(b'"') => break,
            Some(b'\\') => sc.bump(2),
            Some(_) => sc.bump(1),
        }
    }

    let raw = sc.slice_from(start);
    let text = std::str::from_utf8(raw)
        .map_err(|e| Error::syntax(start + e.valid_up_to(), "invalid UTF-8 in string"))?;
    sc.bump(1);
    Ok(text.to_owned())
}

fn parse_number(sc: &mut Scanner<'_>) -> Result<Value> {
    let start = sc.pos();
    if !scan_numeral(sc) {
        return Err(Error::syntax(start, "invalid number"));
    }

    // The numeral is pure ASCII, so the conversion cannot fail on encoding.
    let text = std::str::from_utf8(sc.slice_from(start))
        .map_err(|_| Error::syntax(start, "invalid number"))?;
    let d: f64 = text
        .parse()
        .map_err(|_| Error::syntax(start, format!("invalid number {text:?}")))?;
    Ok(classify_number(d))
}

/// Advance over the longest floating-literal prefix:
/// `[+-]? (digits ("." digits?)? | "." digits) ([eE] [+-]? digits)?`.
///
/// Returns `false`, leaving the cursor where it was, when no mantissa digit is
/// present.
fn scan_numeral(sc: &mut Scanner<'_>) -> bool {
    let mut probe = sc.clone();
    let _ = probe.eat(b'+') || probe.eat(b'-');

    let mut digits = probe.eat_while(|b| b.is_ascii_digit());
    if probe.eat(b'.') {
        digits += probe.eat_while(|b| b.is_ascii_digit());
    }
    if digits == 0 {
        return false;
    }

    // An exponent marker only counts when digits follow it.
    if matches!(probe.peek(), Some(b'e' | b'E')) {
        let mut exp = probe.clone();
        exp.bump(1);
        let _ = exp.eat(b'+') || exp.eat(b'-');
        if exp.eat_while(|b| b.is_ascii_digit()) > 0 {
            probe = exp;
        }
    }

    *sc = probe;
    true
}

/// `Integer` iff the double is integral and survives a round trip through
/// `i64`. The range check stands in for the cast, since `as` saturates.
fn classify_number(d: f64) -> Value {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if d.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&d) {
        Value::Integer(d as i64)
    } else {
        Value::Float(d)
    }
}

/// Keywords in the order they are tried.
fn parse_keyword(sc: &mut Scanner<'_>) -> Option<Value> {
    if sc.eat_literal(b"true") {
        Some(Value::Bool(true))
    } else if sc.eat_literal(b"false") {
        Some(Value::Bool(false))
    } else if sc.eat_literal(b"null") {
        Some(Value::Null)
    } else {
        None
    }
}

fn expect(sc: &mut Scanner<'_>, byte: u8) -> Result<()> {
    if sc.eat(byte) {
        Ok(())
    } else {
        Err(unexpected(sc, &format!("expected {:?}", char::from(byte))))
    }
}

fn unexpected(sc: &Scanner<'_>, expected: &str) -> Error {
    match sc.peek() {
        Some(b) => Error::syntax(sc.pos(), format!("{expected}, found {:?}", char::from(b))),
        None => Error::syntax(sc.pos(), format!("{expected}, found end of input")),
    }
}
