//! Questionnaire ingestion, analysis, graph rendering and fragment
//! generation.
//!
//! This crate has no knowledge of HTTP, file storage, or sessions — it
//! reads an XML document into a typed [`model::Questionnaire`], offers
//! reconciliation/dead-end analyses over it, renders its transition graph as
//! DOT text, and generates new question fragments. Everything here is pure
//! and synchronous; a caller invokes it from wherever it likes.

pub mod analyzer;
pub mod error;
pub mod generator;
pub mod graph;
pub mod model;
pub mod redirect;
pub mod scanner;
pub mod xml;

pub use error::{QflowError, Result, Warning};
pub use model::Questionnaire;
pub use xml::read_questionnaire;
