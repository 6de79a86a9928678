mod indent;
pub mod parallel;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use memchr::memchr;
use smallvec::SmallVec;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::constants::{is_skippable, is_terminator, ATTRIBUTE_SEPARATOR, KEY_SEPARATOR};
use crate::num::coerce::CoerceError;
use crate::schema::{Binding, BlockMap, ListMap, Slot, Target};
use crate::text::name::normalize_key;
use crate::{DecodeOptions, Error, ErrorKind, Result};

pub use indent::{leading_whitespace, IndentTracker, IndentationMismatch};

pub fn decode_str<T: Target + ?Sized>(
    input: &str,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<()> {
    let mut decoder = Decoder::new(target, options);
    for line in input.lines() {
        if decoder.feed(line)? == Flow::Stop {
            break;
        }
    }
    Ok(())
}

pub fn decode_reader<T: Target + ?Sized, R: BufRead>(
    reader: R,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<()> {
    let mut decoder = Decoder::new(target, options);
    for line in reader.lines() {
        let line = line
            .map_err(|err| Error::at_line(ErrorKind::Io(err.to_string()), decoder.line + 1))?;
        if decoder.feed(&line)? == Flow::Stop {
            break;
        }
    }
    Ok(())
}

pub fn decode_file<T: Target + ?Sized, P: AsRef<Path>>(
    path: P,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::source_not_found(path));
    }
    let file = File::open(path).map_err(|err| Error::io(&err))?;
    debug!(path = %path.display(), "decoding file");
    decode_reader(BufReader::new(file), target, options)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Root,
    SimpleList,
    NamedList,
    ExtendedList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Per-call parser state. Lives for exactly one decode invocation.
struct Decoder<'t, T: Target + ?Sized> {
    target: &'t mut T,
    strict: bool,
    mode: Mode,
    /// Field that owns the open list or block.
    field: SmolStr,
    /// Map key of the open named list or block.
    entry: SmolStr,
    indent: IndentTracker,
    line: usize,
    /// Canonical names of scalars assigned in this decode.
    assigned: HashSet<SmolStr>,
}

impl<'t, T: Target + ?Sized> Decoder<'t, T> {
    fn new(target: &'t mut T, options: &DecodeOptions) -> Self {
        Self {
            target,
            strict: options.strict,
            mode: Mode::Root,
            field: SmolStr::default(),
            entry: SmolStr::default(),
            indent: IndentTracker::default(),
            line: 0,
            assigned: HashSet::new(),
        }
    }

    fn feed(&mut self, raw: &str) -> Result<Flow> {
        self.line += 1;
        let trimmed = raw.trim();
        trace!(line = self.line, mode = ?self.mode, "consume");

        if is_terminator(trimmed) {
            debug!(line = self.line, "terminator reached, stopping");
            return Ok(Flow::Stop);
        }
        if is_skippable(trimmed) {
            return Ok(Flow::Continue);
        }

        let outcome = match self.mode {
            Mode::Root => self.key_value_line(raw),
            mode => {
                let leading = leading_whitespace(raw);
                if leading.is_empty() {
                    self.dedent_to_root(raw)
                } else if mode == Mode::ExtendedList {
                    self.block_line(leading, trimmed)
                } else {
                    self.list_line(leading, trimmed)
                }
            }
        };
        outcome.map_err(|kind| Error::at_line(kind, self.line))?;
        Ok(Flow::Continue)
    }

    /// An unindented line closes the open list or block.
    fn dedent_to_root(&mut self, raw: &str) -> std::result::Result<(), ErrorKind> {
        debug!(line = self.line, field = %self.field, "block closed by unindented line");
        self.key_value_line(raw)
    }

    fn enter(&mut self, mode: Mode, field: SmolStr, entry: SmolStr) {
        debug!(line = self.line, ?mode, field = %field, entry = %entry, "enter block");
        self.mode = mode;
        self.indent.open(field.clone(), entry.clone());
        self.field = field;
        self.entry = entry;
    }

    fn key_value_line(&mut self, raw: &str) -> std::result::Result<(), ErrorKind> {
        self.mode = Mode::Root;
        let colon = memchr(KEY_SEPARATOR, raw.as_bytes())
            .ok_or(ErrorKind::Syntax("expected `key: value`"))?;
        let key = normalize_key(&raw[..colon]);
        let value = raw[colon + 1..].trim();

        let (field, slot) = match self.target.bind(&key) {
            Binding::Slot(field, slot) => (field, slot),
            Binding::ReadOnly => return Err(ErrorKind::UnsettableField(key.into())),
            Binding::Missing => return Err(ErrorKind::UnknownField(key.into())),
        };
        let redeclared = self.strict && self.assigned.contains(&field);

        match slot {
            Slot::Str(current) => {
                if redeclared || !current.is_empty() {
                    return Err(ErrorKind::RedeclaredField(field));
                }
                current.push_str(value);
            }
            Slot::Int(slot) => {
                reject_redeclared(redeclared, &field)?;
                slot.assign(value).map_err(|err| coerce_error(err, &field, value))?;
            }
            Slot::Uint(slot) => {
                reject_redeclared(redeclared, &field)?;
                slot.assign(value).map_err(|err| coerce_error(err, &field, value))?;
            }
            Slot::Float(slot) => {
                reject_redeclared(redeclared, &field)?;
                slot.assign(value).map_err(|err| coerce_error(err, &field, value))?;
            }
            Slot::Bool(current) => {
                reject_redeclared(redeclared, &field)?;
                *current = crate::num::coerce::parse_bool(value)
                    .map_err(|err| coerce_error(err, &field, value))?;
            }
            Slot::List(_) => {
                // The value after a list key carries no meaning and is dropped.
                self.enter(Mode::SimpleList, field, SmolStr::default());
                return Ok(());
            }
            Slot::NamedLists(_) => {
                self.enter(Mode::NamedList, field, SmolStr::new(value));
                return Ok(());
            }
            Slot::Blocks(blocks) => {
                let name = declare_block(blocks, value)?;
                self.enter(Mode::ExtendedList, field, name);
                return Ok(());
            }
            Slot::Unsupported(shape) if shape.container => {
                return Err(ErrorKind::InvalidContainerShape {
                    field,
                    shape: shape.description,
                })
            }
            Slot::Unsupported(shape) => {
                return Err(ErrorKind::UnsupportedFieldType {
                    field,
                    shape: shape.description,
                })
            }
        }

        trace!(line = self.line, field = %field, "assigned");
        self.assigned.insert(field);
        Ok(())
    }

    fn list_line(&mut self, leading: &str, trimmed: &str) -> std::result::Result<(), ErrorKind> {
        let items = match self.target.bind(&self.field) {
            Binding::Slot(_, Slot::List(items)) => items,
            Binding::Slot(_, Slot::NamedLists(lists)) => ListMap::entry(lists, &self.entry),
            _ => return Err(ErrorKind::UnknownField(self.field.clone())),
        };
        append_item(&mut self.indent, items, leading, trimmed)
    }

    fn block_line(&mut self, leading: &str, trimmed: &str) -> std::result::Result<(), ErrorKind> {
        let items = match self.target.bind(&self.field) {
            Binding::Slot(_, Slot::Blocks(blocks)) => blocks.items(&self.entry),
            _ => None,
        };
        match items {
            Some(items) => append_item(&mut self.indent, items, leading, trimmed),
            None => Err(ErrorKind::MissingBlockBinding {
                block: self.entry.clone(),
                reason: "block has no items list".to_string(),
            }),
        }
    }
}

/// Appends one content line, fixing the list's signature when it is empty.
fn append_item(
    indent: &mut IndentTracker,
    items: &mut Vec<String>,
    leading: &str,
    trimmed: &str,
) -> std::result::Result<(), ErrorKind> {
    indent
        .check(leading, items.is_empty())
        .map_err(|_| ErrorKind::IndentationMismatch)?;
    items.push(trimmed.to_string());
    Ok(())
}

/// Parses `name attr=value ...` and stores a fresh block under `name`.
fn declare_block(
    blocks: &mut dyn BlockMap,
    declaration: &str,
) -> std::result::Result<SmolStr, ErrorKind> {
    let mut tokens = declaration.split_whitespace();
    let name = tokens
        .next()
        .ok_or(ErrorKind::Syntax("block declaration requires a name"))?;
    let attributes: SmallVec<[(&str, &str); 4]> = tokens
        .filter_map(|token| {
            memchr(ATTRIBUTE_SEPARATOR, token.as_bytes())
                .map(|split| (&token[..split], &token[split + 1..]))
        })
        .collect();
    BlockMap::declare(blocks, name, &attributes)
        .map_err(|err| ErrorKind::MissingBlockBinding {
            block: SmolStr::new(name),
            reason: err.to_string(),
        })?;
    Ok(SmolStr::new(name))
}

fn reject_redeclared(redeclared: bool, field: &SmolStr) -> std::result::Result<(), ErrorKind> {
    if redeclared {
        return Err(ErrorKind::RedeclaredField(field.clone()));
    }
    Ok(())
}

fn coerce_error(err: CoerceError, field: &SmolStr, token: &str) -> ErrorKind {
    let field = field.clone();
    let token = token.to_string();
    match err {
        CoerceError::ExpectedInteger => ErrorKind::ExpectedInteger { field, token },
        CoerceError::ExpectedUnsigned => ErrorKind::ExpectedUnsigned { field, token },
        CoerceError::ExpectedFloat => ErrorKind::ExpectedFloat { field, token },
        CoerceError::ExpectedBoolean => ErrorKind::ExpectedBoolean { field, token },
        CoerceError::IntegerOverflow => ErrorKind::IntegerOverflow { field, token },
        CoerceError::UnsignedOverflow => ErrorKind::UnsignedOverflow { field, token },
        CoerceError::FloatOverflow => ErrorKind::FloatOverflow { field, token },
    }
}
