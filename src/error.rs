use std::fmt;
use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
    #[error("syntax error: {0}")]
    Syntax(&'static str),
    #[error("unknown field \"{0}\"")]
    UnknownField(SmolStr),
    #[error("cannot set field \"{0}\"")]
    UnsettableField(SmolStr),
    #[error("cannot redeclare field \"{0}\"")]
    RedeclaredField(SmolStr),
    #[error("expected integer for \"{field}\", found \"{token}\"")]
    ExpectedInteger { field: SmolStr, token: String },
    #[error("expected unsigned integer for \"{field}\", found \"{token}\"")]
    ExpectedUnsigned { field: SmolStr, token: String },
    #[error("expected float for \"{field}\", found \"{token}\"")]
    ExpectedFloat { field: SmolStr, token: String },
    #[error("expected boolean for \"{field}\", found \"{token}\"")]
    ExpectedBoolean { field: SmolStr, token: String },
    #[error("integer {token} does not fit field \"{field}\"")]
    IntegerOverflow { field: SmolStr, token: String },
    #[error("unsigned integer {token} does not fit field \"{field}\"")]
    UnsignedOverflow { field: SmolStr, token: String },
    #[error("float {token} does not fit field \"{field}\"")]
    FloatOverflow { field: SmolStr, token: String },
    #[error("field \"{field}\" has unsupported type {shape}")]
    UnsupportedFieldType { field: SmolStr, shape: String },
    #[error("field \"{field}\" has invalid container type {shape}")]
    InvalidContainerShape { field: SmolStr, shape: String },
    #[error("line not in block, check indentation")]
    IndentationMismatch,
    #[error("block \"{block}\": {reason}")]
    MissingBlockBinding { block: SmolStr, reason: String },
    #[error("source does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("read failed: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub location: Option<Location>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn at_line(kind: ErrorKind, line: usize) -> Self {
        Self {
            kind,
            location: Some(Location { line }),
        }
    }

    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::SourceNotFound(path.into()))
    }

    pub fn io(err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err.to_string()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn line(&self) -> Option<usize> {
        self.location.map(|location| location.line)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(Location { line }) => write!(f, "{} (line {line})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}
