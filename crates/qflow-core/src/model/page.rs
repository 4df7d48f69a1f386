//! A single page: its body, navigation surface, and the aggregates derived
//! from them while reading.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::question::{AttachedOpen, Header, Question};
use super::trigger::{Jumper, Transition, Trigger, TriggerRedirect};
use super::variable::{VarRef, VariableType};

/// A self-contained unit of the questionnaire: a unique identifier, a body
/// of headers and questions, outgoing transitions, optional jumpers, and
/// triggers — plus the aggregates the reader derives while walking the body
/// and the trigger list (§4.B.5-8).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub uid: String,

    /// Headers that appear directly under `body`, not nested in a question.
    pub headers: Vec<Header>,
    pub questions: Vec<Question>,
    pub transitions: Vec<Transition>,
    pub jumpers: Vec<Jumper>,
    pub triggers: Vec<Trigger>,
    pub attached_opens: Vec<AttachedOpen>,

    /// `vars_used`: every `VarRef` discovered while walking `body`.
    pub body_var_refs: Vec<VarRef>,
    /// Question types in body encounter order (`body_questions_vars`).
    pub body_question_order: Vec<&'static str>,
    /// Type inferred from the enclosing question shape, per variable name
    /// discovered while walking `body` (§4.B.5-6).
    pub inferred_var_types: IndexMap<String, VariableType>,

    /// Names mentioned in `variable`/`jsCheck` trigger attributes.
    pub triggers_vars_explicit: Vec<String>,
    /// Names extracted from `setVariableValue` calls inside action script items.
    pub triggers_vars_implicit: Vec<String>,

    pub triggers_json_save: Vec<String>,
    pub triggers_json_load: Vec<String>,
    pub triggers_json_reset: Vec<String>,

    pub trig_redirect_on_exit_true: Vec<TriggerRedirect>,
    pub trig_redirect_on_exit_false: Vec<TriggerRedirect>,

    /// Every `visible` attribute found anywhere in the page subtree.
    pub visible_conditions: Vec<String>,
}

impl Page {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            headers: Vec::new(),
            questions: Vec::new(),
            transitions: Vec::new(),
            jumpers: Vec::new(),
            triggers: Vec::new(),
            attached_opens: Vec::new(),
            body_var_refs: Vec::new(),
            body_question_order: Vec::new(),
            inferred_var_types: IndexMap::new(),
            triggers_vars_explicit: Vec::new(),
            triggers_vars_implicit: Vec::new(),
            triggers_json_save: Vec::new(),
            triggers_json_load: Vec::new(),
            triggers_json_reset: Vec::new(),
            trig_redirect_on_exit_true: Vec::new(),
            trig_redirect_on_exit_false: Vec::new(),
            visible_conditions: Vec::new(),
        }
    }

    /// Union of body variables and explicit trigger variables, used for
    /// node labels in the graph layer (§4.E).
    pub fn node_variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .body_var_refs
            .iter()
            .map(|v| v.name.clone())
            .chain(self.triggers_vars_explicit.iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
