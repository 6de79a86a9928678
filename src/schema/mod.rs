//! Field binding between normalized ECF keys and a target's storage.
//!
//! A [`Target`] resolves a canonical field name to a [`Binding`]. Static
//! record types get their binding from a [`Schema`] that is built once per
//! type (see [`record!`](crate::record)); [`DynamicRecord`] builds its
//! layout from a runtime [`SchemaDescription`].

mod containers;
pub mod dynamic;

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::num::coerce::{self, CoerceError};
use crate::text::name::{fold_key, pascal_case};

pub use containers::{populate_block, BlockBindError, BlockMap, ListMap};
pub use dynamic::{DynamicRecord, FieldSpec, SchemaDescription};

pub enum Binding<'a> {
    /// Canonical name of the resolved field, and its storage.
    Slot(SmolStr, Slot<'a>),
    /// The field exists but cannot be written.
    ReadOnly,
    Missing,
}

/// Mutable view of one field, restricted to the shapes ECF can fill.
pub enum Slot<'a> {
    Str(&'a mut String),
    Int(IntSlot<'a>),
    Uint(UintSlot<'a>),
    Float(FloatSlot<'a>),
    Bool(&'a mut bool),
    List(&'a mut Vec<String>),
    NamedLists(&'a mut dyn ListMap),
    Blocks(&'a mut dyn BlockMap),
    Unsupported(Shape),
}

/// Description of a field type ECF cannot fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub description: String,
    /// A list or map whose element or key is not a string.
    pub container: bool,
}

pub enum IntSlot<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
}

pub enum UintSlot<'a> {
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
}

pub enum FloatSlot<'a> {
    F32(&'a mut f32),
    F64(&'a mut f64),
}

impl IntSlot<'_> {
    pub fn assign(self, token: &str) -> Result<(), CoerceError> {
        match self {
            IntSlot::I8(slot) => *slot = coerce::parse_signed(token)?,
            IntSlot::I16(slot) => *slot = coerce::parse_signed(token)?,
            IntSlot::I32(slot) => *slot = coerce::parse_signed(token)?,
            IntSlot::I64(slot) => *slot = coerce::parse_signed(token)?,
            IntSlot::Isize(slot) => *slot = coerce::parse_signed(token)?,
        }
        Ok(())
    }
}

impl UintSlot<'_> {
    pub fn assign(self, token: &str) -> Result<(), CoerceError> {
        match self {
            UintSlot::U8(slot) => *slot = coerce::parse_unsigned(token)?,
            UintSlot::U16(slot) => *slot = coerce::parse_unsigned(token)?,
            UintSlot::U32(slot) => *slot = coerce::parse_unsigned(token)?,
            UintSlot::U64(slot) => *slot = coerce::parse_unsigned(token)?,
            UintSlot::Usize(slot) => *slot = coerce::parse_unsigned(token)?,
        }
        Ok(())
    }
}

impl FloatSlot<'_> {
    pub fn assign(self, token: &str) -> Result<(), CoerceError> {
        match self {
            FloatSlot::F32(slot) => *slot = coerce::parse_f32(token)?,
            FloatSlot::F64(slot) => *slot = coerce::parse_f64(token)?,
        }
        Ok(())
    }
}

/// A destination the decoder can bind fields on by canonical name.
pub trait Target {
    fn bind(&mut self, name: &str) -> Binding<'_>;
}

/// A statically declared record type. Implemented through [`record!`](crate::record).
pub trait Record: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

impl<T: Record> Target for T {
    fn bind(&mut self, name: &str) -> Binding<'_> {
        T::schema().bind(self, name)
    }
}

/// Maps a Rust field type onto the slot the decoder writes through.
pub trait Field {
    fn slot(&mut self) -> Slot<'_>;
}

macro_rules! impl_field {
    ($($ty:ty => $wrap:expr),* $(,)?) => {
        $(
            impl Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    $wrap(self)
                }
            }
        )*
    };
}

impl_field! {
    String => Slot::Str,
    bool => Slot::Bool,
    Vec<String> => Slot::List,
    i8 => |v| Slot::Int(IntSlot::I8(v)),
    i16 => |v| Slot::Int(IntSlot::I16(v)),
    i32 => |v| Slot::Int(IntSlot::I32(v)),
    i64 => |v| Slot::Int(IntSlot::I64(v)),
    isize => |v| Slot::Int(IntSlot::Isize(v)),
    u8 => |v| Slot::Uint(UintSlot::U8(v)),
    u16 => |v| Slot::Uint(UintSlot::U16(v)),
    u32 => |v| Slot::Uint(UintSlot::U32(v)),
    u64 => |v| Slot::Uint(UintSlot::U64(v)),
    usize => |v| Slot::Uint(UintSlot::Usize(v)),
    f32 => |v| Slot::Float(FloatSlot::F32(v)),
    f64 => |v| Slot::Float(FloatSlot::F64(v)),
}

/// Canonical name index shared by static and dynamic schemas.
///
/// Lookup tries the exact normalized name first and falls back to the
/// case-folded form.
#[derive(Debug, Default, Clone)]
pub struct FieldIndex {
    exact: HashMap<SmolStr, usize>,
    folded: HashMap<String, usize>,
}

impl FieldIndex {
    pub fn insert(&mut self, name: &str, position: usize) {
        self.exact.insert(SmolStr::new(name), position);
        self.folded.entry(fold_key(name)).or_insert(position);
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.exact
            .get(name)
            .or_else(|| self.folded.get(&fold_key(name)))
            .copied()
    }
}

pub enum Access<T> {
    Writable(fn(&mut T) -> Slot<'_>),
    ReadOnly,
}

pub struct FieldDescriptor<T> {
    name: SmolStr,
    access: Access<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn writable(name: SmolStr, accessor: fn(&mut T) -> Slot<'_>) -> Self {
        Self {
            name,
            access: Access::Writable(accessor),
        }
    }

    pub fn read_only(name: SmolStr) -> Self {
        Self {
            name,
            access: Access::ReadOnly,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

pub struct Schema<T> {
    fields: Vec<FieldDescriptor<T>>,
    index: FieldIndex,
}

impl<T> Schema<T> {
    pub fn new(fields: Vec<FieldDescriptor<T>>) -> Self {
        let mut index = FieldIndex::default();
        for (position, field) in fields.iter().enumerate() {
            index.insert(&field.name, position);
        }
        Self { fields, index }
    }

    pub fn resolve(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.index.lookup(name).map(|position| &self.fields[position])
    }

    pub fn bind<'a>(&self, record: &'a mut T, name: &str) -> Binding<'a> {
        match self.resolve(name) {
            Some(FieldDescriptor {
                name,
                access: Access::Writable(accessor),
            }) => Binding::Slot(name.clone(), accessor(record)),
            Some(_) => Binding::ReadOnly,
            None => Binding::Missing,
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }
}

#[doc(hidden)]
pub fn field_name(ident: &str, explicit: Option<&'static str>) -> SmolStr {
    match explicit {
        Some(name) => SmolStr::new_static(name),
        None => SmolStr::new(pascal_case(ident)),
    }
}

/// Declares the ECF layout of a struct.
///
/// Field names are derived from the Rust identifiers (`work_places` binds
/// `WorkPlaces`) unless an explicit name is given with `=> "Name"`. Fields
/// listed under `readonly` resolve but reject assignment.
///
/// ```
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: u8,
///     hobbies: Vec<String>,
///     checksum: u32,
/// }
///
/// ecf::record! {
///     Person {
///         name,
///         age,
///         hobbies,
///     }
///     readonly { checksum }
/// }
///
/// let person: Person = ecf::from_str("Name: Alice\nAge: 30\n").unwrap();
/// assert_eq!(person.name, "Alice");
/// ```
#[macro_export]
macro_rules! record {
    (
        $ty:ty {
            $( $field:ident $( => $name:literal )? ),* $(,)?
        }
        $( readonly { $( $ro:ident $( => $ro_name:literal )? ),* $(,)? } )?
    ) => {
        impl $crate::Record for $ty {
            fn schema() -> &'static $crate::Schema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::Schema<$ty>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::Schema::new(::std::vec![
                        $(
                            $crate::FieldDescriptor::<$ty>::writable(
                                $crate::schema::field_name(
                                    ::std::stringify!($field),
                                    None $( .or(Some($name)) )?,
                                ),
                                |record: &mut $ty| $crate::Field::slot(&mut record.$field),
                            ),
                        )*
                        $($(
                            $crate::FieldDescriptor::<$ty>::read_only(
                                $crate::schema::field_name(
                                    ::std::stringify!($ro),
                                    None $( .or(Some($ro_name)) )?,
                                ),
                            ),
                        )*)?
                    ])
                })
            }
        }
    };
}
