use std::collections::{BTreeMap, HashMap};

use thiserror::Error as ThisError;

use super::{Binding, Field, Slot, Target};
use crate::constants::{BLOCK_ITEMS_FIELD, BLOCK_NAME_FIELD};
use crate::text::name::normalize_key;

/// Map of list name to ordered string list.
pub trait ListMap {
    /// Returns the list stored under `key`, creating an empty one first.
    fn entry(&mut self, key: &str) -> &mut Vec<String>;
}

/// Map of block name to named block.
pub trait BlockMap {
    /// Builds a fresh block named `name`, applies the declaration attributes
    /// and stores it, replacing any block of the same name.
    fn declare(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), BlockBindError>;

    fn items(&mut self, name: &str) -> Option<&mut Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum BlockBindError {
    #[error("block type has no settable string member `Name`")]
    MissingName,
    #[error("block type has no settable string list member `Items`")]
    MissingItems,
    #[error("unknown block attribute \"{0}\"")]
    UnknownAttribute(String),
    #[error("cannot set block attribute \"{0}\"")]
    UnsettableAttribute(String),
    #[error("block attribute \"{0}\" must be a string")]
    NonStringAttribute(String),
}

/// Initializes `Name` and `Items` on a block and binds each `key=value`
/// attribute to the same-named string member.
pub fn populate_block<B: Target + ?Sized>(
    block: &mut B,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), BlockBindError> {
    match block.bind(BLOCK_NAME_FIELD) {
        Binding::Slot(_, Slot::Str(slot)) => *slot = name.to_string(),
        _ => return Err(BlockBindError::MissingName),
    }
    match block.bind(BLOCK_ITEMS_FIELD) {
        Binding::Slot(_, Slot::List(items)) => items.clear(),
        _ => return Err(BlockBindError::MissingItems),
    }
    for (key, value) in attributes {
        let attribute = normalize_key(key);
        match block.bind(&attribute) {
            Binding::Slot(_, Slot::Str(slot)) => *slot = (*value).to_string(),
            Binding::Slot(..) => return Err(BlockBindError::NonStringAttribute(attribute)),
            Binding::ReadOnly => return Err(BlockBindError::UnsettableAttribute(attribute)),
            Binding::Missing => return Err(BlockBindError::UnknownAttribute(attribute)),
        }
    }
    Ok(())
}

pub(crate) fn block_items<B: Target + ?Sized>(block: &mut B) -> Option<&mut Vec<String>> {
    match block.bind(BLOCK_ITEMS_FIELD) {
        Binding::Slot(_, Slot::List(items)) => Some(items),
        _ => None,
    }
}

impl ListMap for HashMap<String, Vec<String>> {
    fn entry(&mut self, key: &str) -> &mut Vec<String> {
        HashMap::entry(self, key.to_string()).or_default()
    }
}

impl ListMap for BTreeMap<String, Vec<String>> {
    fn entry(&mut self, key: &str) -> &mut Vec<String> {
        BTreeMap::entry(self, key.to_string()).or_default()
    }
}

impl<B: Target + Default> BlockMap for HashMap<String, B> {
    fn declare(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), BlockBindError> {
        let mut block = B::default();
        populate_block(&mut block, name, attributes)?;
        self.insert(name.to_string(), block);
        Ok(())
    }

    fn items(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.get_mut(name).and_then(block_items)
    }
}

impl<B: Target + Default> BlockMap for BTreeMap<String, B> {
    fn declare(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), BlockBindError> {
        let mut block = B::default();
        populate_block(&mut block, name, attributes)?;
        self.insert(name.to_string(), block);
        Ok(())
    }

    fn items(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.get_mut(name).and_then(block_items)
    }
}

impl Field for HashMap<String, Vec<String>> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::NamedLists(self)
    }
}

impl Field for BTreeMap<String, Vec<String>> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::NamedLists(self)
    }
}

impl<B: Target + Default + 'static> Field for HashMap<String, B> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Blocks(self)
    }
}

impl<B: Target + Default + 'static> Field for BTreeMap<String, B> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Blocks(self)
    }
}
