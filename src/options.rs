#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject re-assignment of every scalar kind. When disabled only a
    /// non-empty string field is protected.
    pub strict: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}
