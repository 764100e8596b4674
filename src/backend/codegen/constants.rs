/// Columns added per nesting level.
pub const INDENT_WIDTH: usize = 4;

pub const PYTHON_CONSTRUCTOR: &str = "__init__";
pub const RECEIVER: &str = "self";

/// Body emitted for a block with no statements.
pub const EMPTY_BODY: &str = "pass";

/// Operator spellings that differ between sprig and Python. Operators missing
/// from a table are emitted unchanged.
pub const COMPARISON_ALIASES: &[(&str, &str)] = &[("===", "=="), ("!==", "!="), ("<>", "!=")];

pub const LOGIC_ALIASES: &[(&str, &str)] = &[("&&", "and"), ("||", "or")];

/// Code points Python's `str.isprintable` rejects besides control characters:
/// separators other than the ASCII space, format characters and private use.
pub const NON_PRINTABLE_RANGES: &[(u32, u32)] = &[
    (0x00A0, 0x00A0),
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x2000, 0x200F),
    (0x2028, 0x202F),
    (0x205F, 0x2064),
    (0x2066, 0x206F),
    (0x3000, 0x3000),
    (0xE000, 0xF8FF),
    (0xFDD0, 0xFDEF),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x13438),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
    (0xF0000, 0xFFFFD),
    (0x100000, 0x10FFFD),
];
