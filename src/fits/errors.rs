#[derive(Debug, thiserror::Error)]
pub enum FitsError {
    #[error("Invalid FITS format: {0}")]
    InvalidFormat(String),

    #[error("Keyword {keyword} not found")]
    KeywordNotFound { keyword: String },

    #[error("Invalid keyword value: {keyword} = {value}")]
    InvalidKeywordValue { keyword: String, value: String },

    #[error("Invalid TFORM value: {0}")]
    InvalidTform(String),

    #[error("Column {0} not found in table")]
    ColumnNotFound(String),

    #[error("Column {name} has format {tform}, cannot read as {requested}")]
    ColumnTypeMismatch {
        name: String,
        tform: String,
        requested: &'static str,
    },

    #[error("EOF reached unexpectedly")]
    UnexpectedEof,
}

pub type Result<T> = std::result::Result<T, FitsError>;
