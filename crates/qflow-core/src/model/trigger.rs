//! Transitions, jumpers and triggers: the navigation surface of a page.

use serde::{Deserialize, Serialize};

/// A conditional outgoing edge to another page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub target_uid: String,
    pub condition: String,
}

impl Transition {
    pub const DEFAULT_CONDITION: &'static str = "true";

    pub fn new(target_uid: impl Into<String>, condition: Option<String>) -> Self {
        Self {
            target_uid: target_uid.into(),
            condition: condition.unwrap_or_else(|| Self::DEFAULT_CONDITION.to_string()),
        }
    }

    /// A transition classifies as "only false" when its condition, after
    /// trimming whitespace, is the literal text `"false"`.
    pub fn is_literally_false(&self) -> bool {
        self.condition.trim() == "false"
    }
}

/// A value-driven edge, typically used for embedded loops over an episode
/// list. Its target never carries a leading `/` — any leading slash on the
/// raw XML attribute is stripped exactly once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jumper {
    pub value: String,
    pub target: String,
}

impl Jumper {
    pub fn new(value: impl Into<String>, raw_target: impl AsRef<str>) -> Self {
        let target = raw_target.as_ref().strip_prefix('/').unwrap_or(raw_target.as_ref());
        Self {
            value: value.into(),
            target: target.to_string(),
        }
    }
}

/// One `scriptItem` child of an `action` trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptItem {
    pub value: String,
}

/// Direction in which a trigger fires relative to page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerDirection {
    Forward,
    Backward,
}

impl TriggerDirection {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("backward") {
            TriggerDirection::Backward
        } else {
            TriggerDirection::Forward
        }
    }
}

impl Default for TriggerDirection {
    fn default() -> Self {
        TriggerDirection::Forward
    }
}

/// A side-effecting operation bound to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Runs a scripted `command` expression, plus zero or more `scriptItem`
    /// expressions (`toLoad.add`, `toReset.add`, `toPersist.put`,
    /// `setVariableValue`, `navigatorBean.redirect`, …).
    Action {
        command: String,
        script_items: Vec<ScriptItem>,
        condition: String,
        on_exit: bool,
        direction: TriggerDirection,
    },
    /// Sets `variable` to `value` when `condition` holds.
    Variable {
        variable: String,
        value: String,
        condition: String,
        on_exit: bool,
        direction: TriggerDirection,
    },
    /// Validates a relationship between three referenced variables.
    JsCheck {
        variable: String,
        xvar: String,
        yvar: String,
        condition: String,
        on_exit: bool,
        direction: TriggerDirection,
    },
}

impl Trigger {
    pub const DEFAULT_CONDITION: &'static str = "true";

    pub fn condition(&self) -> &str {
        match self {
            Trigger::Action { condition, .. }
            | Trigger::Variable { condition, .. }
            | Trigger::JsCheck { condition, .. } => condition,
        }
    }

    pub fn on_exit(&self) -> bool {
        match self {
            Trigger::Action { on_exit, .. }
            | Trigger::Variable { on_exit, .. }
            | Trigger::JsCheck { on_exit, .. } => *on_exit,
        }
    }

    /// `on_exit` parses `"true"`/`"false"`, defaulting to `true` when the
    /// attribute is absent.
    pub fn parse_on_exit(raw: Option<&str>) -> bool {
        match raw {
            Some(v) => !v.eq_ignore_ascii_case("false"),
            None => true,
        }
    }
}

/// A `(target_uid, condition)` pair derived from resolving an action
/// trigger's redirect call — either a direct string literal or an indirect
/// auxiliary-variable lookup (§4.G).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRedirect {
    pub target_cond_list: Vec<(String, String)>,
}

impl TriggerRedirect {
    pub fn single(target: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            target_cond_list: vec![(target.into(), condition.into())],
        }
    }
}
