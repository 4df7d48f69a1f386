//! The typed questionnaire model: pages, questions, response domains,
//! variables, transitions and triggers (spec §3).

mod page;
mod question;
mod questionnaire;
mod trigger;
mod variable;

pub use page::Page;
pub use question::{
    AnswerOption, AttachedOpen, Header, HeaderKind, Item, OpenItem, Question, ResponseDomain,
    SingleChoiceSubtype,
};
pub use questionnaire::Questionnaire;
pub use trigger::{Jumper, ScriptItem, Transition, Trigger, TriggerDirection, TriggerRedirect};
pub use variable::{VarRef, Variable, VariableType};

/// Fixed prefix preload variable names are given before being folded into
/// the declared-variable map. Preload values are always typed `string`.
///
/// Decision recorded in DESIGN.md: the spec leaves the exact prefix string
/// as an "observe the source" open question; no source is attached to this
/// expansion, so a concrete, documented convention is chosen instead.
pub const PRELOAD_VARIABLE_PREFIX: &str = "preload_";
