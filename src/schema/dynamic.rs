//! Records whose layout is described at runtime.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use smol_str::SmolStr;

use super::containers::{block_items, populate_block, BlockBindError, BlockMap};
use super::{Binding, FieldIndex, FloatSlot, IntSlot, Shape, Slot, Target, UintSlot};
use crate::constants::{BLOCK_ITEMS_FIELD, BLOCK_NAME_FIELD};
use crate::text::name::fold_key;

/// Serializable field layout, typically loaded from JSON:
///
/// ```json
/// {"fields": [
///   {"name": "Name", "type": "string"},
///   {"name": "Hobbies", "type": "list<string>"},
///   {"name": "Languages", "type": "map<string,block>", "attributes": ["Native"]}
/// ]}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDescription {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default)]
    pub readonly: bool,
    /// Extra string members of each named block (`map<string,block>` only).
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TypeSpec {
    String,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    List,
    NamedLists,
    Blocks,
    InvalidContainer(String),
    Unsupported(String),
}

impl From<String> for TypeSpec {
    fn from(raw: String) -> Self {
        let compact: String = raw
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match compact.as_str() {
            "string" => TypeSpec::String,
            "i8" => TypeSpec::I8,
            "i16" => TypeSpec::I16,
            "i32" => TypeSpec::I32,
            "i64" => TypeSpec::I64,
            "u8" => TypeSpec::U8,
            "u16" => TypeSpec::U16,
            "u32" => TypeSpec::U32,
            "u64" => TypeSpec::U64,
            "f32" => TypeSpec::F32,
            "f64" => TypeSpec::F64,
            "bool" => TypeSpec::Bool,
            "list<string>" => TypeSpec::List,
            "map<string,list<string>>" => TypeSpec::NamedLists,
            "map<string,block>" => TypeSpec::Blocks,
            other if other.starts_with("list<") || other.starts_with("map<") => {
                TypeSpec::InvalidContainer(raw)
            }
            _ => TypeSpec::Unsupported(raw),
        }
    }
}

impl SchemaDescription {
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

#[derive(Debug, Clone)]
enum Storage {
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    List(Vec<String>),
    NamedLists(BTreeMap<String, Vec<String>>),
    Blocks(DynBlocks),
    Unsupported(Shape),
}

impl Storage {
    fn empty(spec: &FieldSpec) -> Self {
        match &spec.ty {
            TypeSpec::String => Storage::Str(String::new()),
            TypeSpec::I8 => Storage::I8(0),
            TypeSpec::I16 => Storage::I16(0),
            TypeSpec::I32 => Storage::I32(0),
            TypeSpec::I64 => Storage::I64(0),
            TypeSpec::U8 => Storage::U8(0),
            TypeSpec::U16 => Storage::U16(0),
            TypeSpec::U32 => Storage::U32(0),
            TypeSpec::U64 => Storage::U64(0),
            TypeSpec::F32 => Storage::F32(0.0),
            TypeSpec::F64 => Storage::F64(0.0),
            TypeSpec::Bool => Storage::Bool(false),
            TypeSpec::List => Storage::List(Vec::new()),
            TypeSpec::NamedLists => Storage::NamedLists(BTreeMap::new()),
            TypeSpec::Blocks => Storage::Blocks(DynBlocks::new(&spec.attributes)),
            TypeSpec::InvalidContainer(raw) => Storage::Unsupported(Shape {
                description: raw.clone(),
                container: true,
            }),
            TypeSpec::Unsupported(raw) => Storage::Unsupported(Shape {
                description: raw.clone(),
                container: false,
            }),
        }
    }

    fn slot(&mut self) -> Slot<'_> {
        match self {
            Storage::Str(value) => Slot::Str(value),
            Storage::I8(value) => Slot::Int(IntSlot::I8(value)),
            Storage::I16(value) => Slot::Int(IntSlot::I16(value)),
            Storage::I32(value) => Slot::Int(IntSlot::I32(value)),
            Storage::I64(value) => Slot::Int(IntSlot::I64(value)),
            Storage::U8(value) => Slot::Uint(UintSlot::U8(value)),
            Storage::U16(value) => Slot::Uint(UintSlot::U16(value)),
            Storage::U32(value) => Slot::Uint(UintSlot::U32(value)),
            Storage::U64(value) => Slot::Uint(UintSlot::U64(value)),
            Storage::F32(value) => Slot::Float(FloatSlot::F32(value)),
            Storage::F64(value) => Slot::Float(FloatSlot::F64(value)),
            Storage::Bool(value) => Slot::Bool(value),
            Storage::List(value) => Slot::List(value),
            Storage::NamedLists(value) => Slot::NamedLists(value),
            Storage::Blocks(value) => Slot::Blocks(value),
            Storage::Unsupported(shape) => Slot::Unsupported(shape.clone()),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Storage::Str(value) => Value::from(value.as_str()),
            Storage::I8(value) => Value::from(*value),
            Storage::I16(value) => Value::from(*value),
            Storage::I32(value) => Value::from(*value),
            Storage::I64(value) => Value::from(*value),
            Storage::U8(value) => Value::from(*value),
            Storage::U16(value) => Value::from(*value),
            Storage::U32(value) => Value::from(*value),
            Storage::U64(value) => Value::from(*value),
            Storage::F32(value) => Value::from(*value),
            Storage::F64(value) => Value::from(*value),
            Storage::Bool(value) => Value::from(*value),
            Storage::List(items) => string_array(items),
            Storage::NamedLists(lists) => Value::Object(
                lists
                    .iter()
                    .map(|(key, items)| (key.clone(), string_array(items)))
                    .collect(),
            ),
            Storage::Blocks(blocks) => blocks.to_json(),
            Storage::Unsupported(_) => Value::Null,
        }
    }
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().map(|item| Value::from(item.as_str())).collect())
}

#[derive(Debug, Clone)]
struct DynField {
    name: SmolStr,
    readonly: bool,
    storage: Storage,
}

/// A target record whose fields come from a [`SchemaDescription`].
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    fields: Vec<DynField>,
    index: FieldIndex,
}

impl DynamicRecord {
    pub fn new(description: &SchemaDescription) -> Self {
        let mut index = FieldIndex::default();
        let fields = description
            .fields
            .iter()
            .enumerate()
            .map(|(position, spec)| {
                index.insert(&spec.name, position);
                DynField {
                    name: SmolStr::new(&spec.name),
                    readonly: spec.readonly,
                    storage: Storage::empty(spec),
                }
            })
            .collect();
        Self { fields, index }
    }

    /// Renders every field in declaration order; fields of an unsupported
    /// type render as `null`.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| (field.name.to_string(), field.storage.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Target for DynamicRecord {
    fn bind(&mut self, name: &str) -> Binding<'_> {
        let Some(position) = self.index.lookup(name) else {
            return Binding::Missing;
        };
        let field = &mut self.fields[position];
        if field.readonly {
            return Binding::ReadOnly;
        }
        Binding::Slot(field.name.clone(), field.storage.slot())
    }
}

#[derive(Debug, Clone)]
struct DynBlocks {
    attributes: Arc<[SmolStr]>,
    entries: BTreeMap<String, DynBlock>,
}

impl DynBlocks {
    fn new(attributes: &[String]) -> Self {
        Self {
            attributes: attributes.iter().map(SmolStr::new).collect(),
            entries: BTreeMap::new(),
        }
    }

    fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, block)| (key.clone(), block.to_json()))
                .collect(),
        )
    }
}

impl BlockMap for DynBlocks {
    fn declare(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), BlockBindError> {
        let mut block = DynBlock::new(&self.attributes);
        populate_block(&mut block, name, attributes)?;
        self.entries.insert(name.to_string(), block);
        Ok(())
    }

    fn items(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.entries.get_mut(name).and_then(block_items)
    }
}

#[derive(Debug, Clone)]
struct DynBlock {
    name: String,
    items: Vec<String>,
    attributes: Vec<(SmolStr, String)>,
}

impl DynBlock {
    fn new(attributes: &[SmolStr]) -> Self {
        Self {
            name: String::new(),
            items: Vec::new(),
            attributes: attributes
                .iter()
                .map(|key| (key.clone(), String::new()))
                .collect(),
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(BLOCK_NAME_FIELD.to_string(), Value::from(self.name.as_str()));
        for (key, value) in &self.attributes {
            map.insert(key.to_string(), Value::from(value.as_str()));
        }
        map.insert(BLOCK_ITEMS_FIELD.to_string(), string_array(&self.items));
        Value::Object(map)
    }
}

impl Target for DynBlock {
    fn bind(&mut self, name: &str) -> Binding<'_> {
        match name {
            BLOCK_NAME_FIELD => {
                return Binding::Slot(
                    SmolStr::new_static(BLOCK_NAME_FIELD),
                    Slot::Str(&mut self.name),
                )
            }
            BLOCK_ITEMS_FIELD => {
                return Binding::Slot(
                    SmolStr::new_static(BLOCK_ITEMS_FIELD),
                    Slot::List(&mut self.items),
                )
            }
            _ => {}
        }
        let folded = fold_key(name);
        let position = self
            .attributes
            .iter()
            .position(|(key, _)| key == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .position(|(key, _)| fold_key(key) == folded)
            });
        match position {
            Some(position) => {
                let (key, value) = &mut self.attributes[position];
                Binding::Slot(key.clone(), Slot::Str(value))
            }
            None => Binding::Missing,
        }
    }
}
