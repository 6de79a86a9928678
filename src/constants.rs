pub const TERMINATOR: &str = "###";

pub const COMMENT_MARKER: char = '#';

pub const KEY_SEPARATOR: u8 = b':';

pub const ATTRIBUTE_SEPARATOR: u8 = b'=';

pub const TRUE_LITERALS: &[&str] = &["true", "yes", "t", "1"];

pub const FALSE_LITERALS: &[&str] = &["false", "no", "f", "0"];

/// Member of a named block that receives the declared name.
pub const BLOCK_NAME_FIELD: &str = "Name";

/// Member of a named block that receives the indented content lines.
pub const BLOCK_ITEMS_FIELD: &str = "Items";

#[inline]
pub fn is_terminator(trimmed: &str) -> bool {
    trimmed.starts_with(TERMINATOR)
}

#[inline]
pub fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER)
}
