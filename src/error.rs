use thiserror::Error;

/// Reasons a string could not be read as a Camelot key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("key is empty")]
    Empty,

    #[error("invalid wheel position '{0}'")]
    InvalidNumber(String),

    #[error("wheel position {0} is outside 1-12")]
    NumberOutOfRange(u32),

    #[error("invalid mode letter '{0}', expected A or B")]
    InvalidMode(char),

    /// Neither Camelot nor standard notation
    #[error("unrecognized key '{0}'")]
    Unrecognized(String),
}
