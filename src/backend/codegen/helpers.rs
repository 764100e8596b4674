use crate::ast::Number;

use super::constants::{INDENT_WIDTH, NON_PRINTABLE_RANGES};

/// Indents every non-blank line of already generated code by one level.
pub fn indent_block(code: &str) -> String {
    let spaces = " ".repeat(INDENT_WIDTH);
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{spaces}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn alias<'a>(table: &[(&str, &'a str)], op: &'a str) -> &'a str {
    table
        .iter()
        .find(|(from, _)| *from == op)
        .map_or(op, |(_, to)| *to)
}

pub fn number_literal(number: &Number) -> String {
    match number {
        Number::Int(value) => value.to_string(),
        Number::Float(value) => float_literal(*value),
    }
}

/// Spells a float the way Python's `repr` does: shortest round-trip digits,
/// positional between 1e-4 and 1e16, otherwise exponent with a sign and at
/// least two digits.
pub fn float_literal(value: f64) -> String {
    if value.is_nan() {
        return "float('nan')".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "float('inf')" } else { "-float('inf')" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return format!("{:?}", value);
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Quotes a string with Python's `repr` rules: single quotes unless the text
/// contains a single quote and no double quote.
pub fn string_literal(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02x}"));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{code:04x}"));
                } else {
                    out.push_str(&format!("\\U{code:08x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Python's `str.isprintable` for one character. Unassigned code points are
/// treated as printable except for the noncharacters.
fn is_printable(c: char) -> bool {
    let code = c as u32;
    if c.is_control() || code & 0xfffe == 0xfffe {
        return false;
    }
    !NON_PRINTABLE_RANGES
        .iter()
        .any(|&(low, high)| (low..=high).contains(&code))
}
