//! XML↔model mapping: a generic tree builder, recognized element/attribute
//! constants, and the semantic reader built on top of both (spec §4.B).

pub mod constants;
pub mod reader;
pub mod tree;

pub use reader::read_questionnaire;
pub use tree::XmlNode;
