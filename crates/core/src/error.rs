use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// Row index past the last data row.
    RowOutOfRange { index: usize, len: usize },
    /// Column index past the last column.
    ColumnOutOfRange { index: usize, len: usize },
    /// Header name that matches no column.
    UnknownHeader(String),
    /// Header name used on a sheet loaded without header mode.
    HeadersDisabled(String),
    /// Payload is not valid CSV/JSON, or the JSON has no `values` array.
    Parse(String),
}

impl SheetError {
    /// True for accessor misuse (bad index or header name), false for parse failures.
    pub fn is_lookup(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { index, len } => {
                write!(f, "row {index} out of range (sheet has {len} data rows)")
            }
            Self::ColumnOutOfRange { index, len } => {
                write!(f, "column {index} out of range (sheet has {len} columns)")
            }
            Self::UnknownHeader(name) => write!(f, "no column with header '{name}'"),
            Self::HeadersDisabled(name) => {
                write!(f, "cannot look up '{name}' by name: sheet was loaded without headers")
            }
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SheetError {}
