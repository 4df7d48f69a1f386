//! Declared variables and references to them from question bodies.

use serde::{Deserialize, Serialize};

/// The type a variable is declared or inferred to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    SingleChoiceAnswerOption,
    Boolean,
    String,
    Number,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::SingleChoiceAnswerOption => "singleChoiceAnswerOption",
            VariableType::Boolean => "boolean",
            VariableType::String => "string",
            VariableType::Number => "number",
        }
    }
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared variable: a stable `name` and the type it is declared (or
/// convention-inferred, for preloads) to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub var_type: VariableType,
}

impl Variable {
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
        }
    }
}

/// A reference to a declared variable found while walking a page body.
///
/// `condition` is the sequence of `visible`/`condition` attribute
/// expressions encountered while climbing from the reference up to its
/// page, innermost first. It is informational only: used in reports and the
/// details view, never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRef {
    pub name: String,
    pub condition: Vec<String>,
}

impl VarRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: Vec::new(),
        }
    }

    pub fn with_condition(name: impl Into<String>, condition: Vec<String>) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }
}
