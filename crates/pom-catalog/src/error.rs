//! Error types for the catalog codec.

/// Errors raised while parsing catalog text.
///
/// Every variant carries the 1-based line number where parsing stopped so
/// the message can be printed as-is next to the file name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A line did not match any known PO construct.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A backslash escape that PO does not define.
    #[error("line {line}: invalid escape sequence '\\{sequence}'")]
    InvalidEscape { line: usize, sequence: char },

    /// A second entry with empty msgid and no context.
    #[error("line {line}: duplicate header entry")]
    DuplicateHeader { line: usize },

    /// An entry ended before any msgstr was given.
    #[error("line {line}: missing msgstr for msgid {msgid:?}")]
    MissingMsgstr { line: usize, msgid: String },
}

impl CodecError {
    /// Create a syntax error at the given line.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// The line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. }
            | Self::InvalidEscape { line, .. }
            | Self::DuplicateHeader { line }
            | Self::MissingMsgstr { line, .. } => *line,
        }
    }
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;
