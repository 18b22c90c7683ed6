use thiserror::Error;

use crate::mode::UnknownNameError;

/// Errors raised while saving or loading filters and columns as XML.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("incompatible filter: expected `{expected}`, found `{found}`")]
    IncompatibleFilter { expected: String, found: String },
    #[error("missing `{attribute}` attribute on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("invalid value `{value}` for attribute `{attribute}`")]
    InvalidAttribute { attribute: String, value: String },
    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement { expected: &'static str, found: String },
    #[error("document ended inside <{0}>")]
    UnexpectedEof(&'static str),
    #[error(transparent)]
    UnknownName(#[from] UnknownNameError),
}

impl PersistError {
    pub(crate) fn invalid(attribute: &str, value: &str) -> Self {
        PersistError::InvalidAttribute {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

/// Errors raised while building [`ColumnOptions`](crate::ColumnOptions).
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown locale `{0}`")]
    UnknownLocale(String),
    #[error("unknown numeric format `{0}`")]
    UnknownNumericFormat(char),
    #[error("{0} digits is more than the {max} supported", max = colflow_format::MAX_DIGITS)]
    DigitsOutOfRange(usize),
    #[error("invalid date/time format `{0}`")]
    InvalidDateTimeFormat(String),
}
