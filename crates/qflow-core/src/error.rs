//! Error types for questionnaire loading and generation.
//!
//! Fatal failures (a document that cannot be read at all) are `QflowError`
//! variants. Everything the analyzer or reader merely *notices* — an
//! unresolved transition target, a variable whose declared type drifted from
//! its inferred type, an unknown trigger tag — is a [`Warning`] pushed onto
//! [`crate::model::Questionnaire::warnings`], never an `Err`.

use thiserror::Error;

/// Errors that abort loading or generating a questionnaire.
#[derive(Debug, Error)]
pub enum QflowError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    /// A schema-required attribute was missing on an element.
    #[error("element `{element}` is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// The same variable name was discovered under two incompatible question
    /// shapes within a single page's body pass.
    #[error(
        "variable `{name}` is used as both `{first_type}` (on page `{page}`) and `{second_type}`"
    )]
    InconsistentInferredType {
        name: String,
        page: String,
        first_type: &'static str,
        second_type: &'static str,
    },

    /// Underlying XML reader error, surfaced verbatim.
    #[error("XML reader error: {0}")]
    Reader(#[from] quick_xml::Error),

    /// Underlying XML attribute error, surfaced verbatim.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Failure reading the source bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 encountered while decoding an attribute or element value.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, QflowError>;

/// A non-fatal condition recorded on a [`crate::model::Questionnaire`] rather
/// than returned as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A transition or jumper target that does not resolve to any page.
    UnresolvedTarget { from_page: String, target: String },

    /// A variable's declared type differs from its inferred-from-use type.
    DeclaredTypeMismatch {
        name: String,
        declared_type: String,
        inferred_type: String,
    },

    /// A variable's inferred type differed between two pages. The first
    /// page's type is kept in `all_page_body_vars`; this records the later,
    /// discarded type instead of silently overwriting it.
    InferredTypeVariesAcrossPages {
        name: String,
        first_type: String,
        other_type: String,
    },

    /// A `triggers` child element with an unrecognized tag was skipped.
    UnknownTriggerTag { page: String, tag: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnresolvedTarget { from_page, target } => write!(
                f,
                "page `{from_page}` points to unresolved target `{target}`"
            ),
            Warning::DeclaredTypeMismatch {
                name,
                declared_type,
                inferred_type,
            } => write!(
                f,
                "variable `{name}` declared as `{declared_type}` but used as `{inferred_type}`"
            ),
            Warning::InferredTypeVariesAcrossPages {
                name,
                first_type,
                other_type,
            } => write!(
                f,
                "variable `{name}` inferred as `{first_type}` on an earlier page but `{other_type}` here"
            ),
            Warning::UnknownTriggerTag { page, tag } => {
                write!(f, "page `{page}` has unknown trigger tag `{tag}`")
            }
        }
    }
}
