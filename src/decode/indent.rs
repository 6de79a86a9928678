use std::collections::HashMap;

use smol_str::SmolStr;

/// Leading ASCII whitespace of a raw line.
#[inline]
pub fn leading_whitespace(raw: &str) -> &str {
    let end = raw
        .bytes()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(raw.len());
    &raw[..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationMismatch;

/// Whitespace signatures of every list and block seen in one decode.
///
/// A list is keyed by its field and, for named lists and blocks, its entry
/// name. A line landing in an empty list fixes that list's signature; every
/// later line of the same list must repeat it byte for byte, including
/// after the list is reopened further down the document.
#[derive(Debug, Default)]
pub struct IndentTracker {
    active: (SmolStr, SmolStr),
    signatures: HashMap<(SmolStr, SmolStr), String>,
}

impl IndentTracker {
    /// Makes `field`/`entry` the list subsequent lines are checked against.
    pub fn open(&mut self, field: SmolStr, entry: SmolStr) {
        self.active = (field, entry);
    }

    /// Checks `leading` against the active list. `empty` tells whether the
    /// list holds no items yet, in which case `leading` becomes its signature.
    pub fn check(&mut self, leading: &str, empty: bool) -> Result<(), IndentationMismatch> {
        match self.signatures.get(&self.active) {
            Some(signature) if !empty => {
                if signature == leading {
                    Ok(())
                } else {
                    Err(IndentationMismatch)
                }
            }
            _ => {
                self.signatures
                    .insert(self.active.clone(), leading.to_string());
                Ok(())
            }
        }
    }

    pub fn signature(&self) -> Option<&str> {
        self.signatures.get(&self.active).map(String::as_str)
    }
}
