//! Decoder for ECF, a small line-oriented configuration format.
//!
//! ```text
//! # comment
//! Name: Alice
//! Age: 30
//! Hobbies:
//!   Reading
//!   Chess
//! WorkPlaces: Acme
//!   Office1
//! Languages: English native=true
//!   Hello
//! ###
//! anything after the terminator is ignored
//! ```
//!
//! Keys are normalized (`hourly rate` binds `HourlyRate`) and resolved
//! against the target at decode time, through the [`Target`] capability.

pub mod constants;
pub mod decode;
pub mod error;
pub mod num;
pub mod options;
pub mod schema;
pub mod text;

use std::io::BufRead;
use std::path::Path;

pub use crate::decode::parallel::decode_paths;
pub use crate::error::{Error, ErrorKind, Location};
pub use crate::options::DecodeOptions;
pub use crate::schema::{
    Binding, BlockMap, DynamicRecord, Field, FieldDescriptor, ListMap, Record, Schema, SchemaDescription,
    Slot, Target,
};

pub type Result<T> = std::result::Result<T, Error>;

pub fn decode_str<T: Target + ?Sized>(input: &str, target: &mut T) -> Result<()> {
    decode_str_with_options(input, target, &DecodeOptions::default())
}

pub fn decode_str_with_options<T: Target + ?Sized>(
    input: &str,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<()> {
    decode::decode_str(input, target, options)
}

pub fn decode_reader<T: Target + ?Sized, R: BufRead>(reader: R, target: &mut T) -> Result<()> {
    decode_reader_with_options(reader, target, &DecodeOptions::default())
}

pub fn decode_reader_with_options<T: Target + ?Sized, R: BufRead>(
    reader: R,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<()> {
    decode::decode_reader(reader, target, options)
}

pub fn decode_file<T: Target + ?Sized, P: AsRef<Path>>(path: P, target: &mut T) -> Result<()> {
    decode_file_with_options(path, target, &DecodeOptions::default())
}

pub fn decode_file_with_options<T: Target + ?Sized, P: AsRef<Path>>(
    path: P,
    target: &mut T,
    options: &DecodeOptions,
) -> Result<()> {
    decode::decode_file(path, target, options)
}

pub fn from_str<T: Target + Default>(input: &str) -> Result<T> {
    from_str_with_options(input, &DecodeOptions::default())
}

pub fn from_str_with_options<T: Target + Default>(
    input: &str,
    options: &DecodeOptions,
) -> Result<T> {
    let mut target = T::default();
    decode::decode_str(input, &mut target, options)?;
    Ok(target)
}

pub fn from_reader<T: Target + Default, R: BufRead>(reader: R) -> Result<T> {
    from_reader_with_options(reader, &DecodeOptions::default())
}

pub fn from_reader_with_options<T: Target + Default, R: BufRead>(
    reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    let mut target = T::default();
    decode::decode_reader(reader, &mut target, options)?;
    Ok(target)
}

pub fn from_path<T: Target + Default, P: AsRef<Path>>(path: P) -> Result<T> {
    from_path_with_options(path, &DecodeOptions::default())
}

pub fn from_path_with_options<T: Target + Default, P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<T> {
    let mut target = T::default();
    decode::decode_file(path, &mut target, options)?;
    Ok(target)
}
