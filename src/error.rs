use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("division by zero: displacement is 0 for car model {model}")]
    DivisionByZero { model: String },
    #[error("aggregate requested over an empty group")]
    EmptyGroup,
    #[error("schema mismatch at record {index}: missing or malformed `{field}`")]
    SchemaMismatch { index: usize, field: String },
    #[error("XML error: {0}")]
    Xml(String),
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub(crate) fn schema(index: usize, field: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            index,
            field: field.into(),
        }
    }

    pub(crate) fn xml(e: impl std::fmt::Display) -> Self {
        Self::Xml(e.to_string())
    }
}
