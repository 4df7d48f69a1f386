//! Questions, response domains, answer options and headers.

use serde::{Deserialize, Serialize};

use super::variable::VarRef;

/// One of the header element kinds a question or page body may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderKind {
    Title,
    Text,
    Question,
    Introduction,
    Instruction,
}

impl HeaderKind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            HeaderKind::Title => "title",
            HeaderKind::Text => "text",
            HeaderKind::Question => "question",
            HeaderKind::Introduction => "introduction",
            HeaderKind::Instruction => "instruction",
        }
    }
}

/// A `title` / `text` / `question` / `introduction` / `instruction` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub kind: HeaderKind,
    pub uid: String,
    pub visible: Option<String>,
    pub block: Option<String>,
    pub content: String,
}

/// An open-ended text field attached to an answer option or matrix item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedOpen {
    pub uid: String,
    pub variable: String,
    pub visible: Option<String>,
}

/// One selectable choice within a response domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOption {
    /// A single-choice option: its `value` is an opaque string written into
    /// the owning response domain's variable when selected.
    SingleChoice {
        uid: String,
        value: String,
        label: String,
        visible: Option<String>,
        missing: bool,
        attached_opens: Vec<AttachedOpen>,
    },
    /// A multiple-choice option: selecting it sets its own boolean variable.
    MultipleChoice {
        uid: String,
        var_ref: VarRef,
        exclusive: bool,
        label: String,
        visible: Option<String>,
        missing: bool,
        attached_opens: Vec<AttachedOpen>,
    },
}

impl AnswerOption {
    pub fn uid(&self) -> &str {
        match self {
            AnswerOption::SingleChoice { uid, .. } => uid,
            AnswerOption::MultipleChoice { uid, .. } => uid,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AnswerOption::SingleChoice { label, .. } => label,
            AnswerOption::MultipleChoice { label, .. } => label,
        }
    }

    pub fn missing(&self) -> bool {
        match self {
            AnswerOption::SingleChoice { missing, .. } => *missing,
            AnswerOption::MultipleChoice { missing, .. } => *missing,
        }
    }

    pub fn attached_opens(&self) -> &[AttachedOpen] {
        match self {
            AnswerOption::SingleChoice { attached_opens, .. } => attached_opens,
            AnswerOption::MultipleChoice { attached_opens, .. } => attached_opens,
        }
    }
}

/// Subtype of a single-choice response domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SingleChoiceSubtype {
    Plain,
    Dropdown,
}

impl SingleChoiceSubtype {
    /// Source XML uses inconsistent casing (`dropdown` vs. `dropDown`).
    /// Parsing is case-insensitive; generation always emits the lower-case
    /// canonical form.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("dropdown") {
            SingleChoiceSubtype::Dropdown
        } else {
            SingleChoiceSubtype::Plain
        }
    }

    pub fn canonical(&self) -> &'static str {
        match self {
            SingleChoiceSubtype::Plain => "plain",
            SingleChoiceSubtype::Dropdown => "dropdown",
        }
    }
}

/// One row of a matrix response domain: its own response domain, header
/// list and attached-open list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uid: String,
    pub headers: Vec<Header>,
    pub domain: Box<ResponseDomain>,
    pub attached_opens: Vec<AttachedOpen>,
}

/// One row of a matrix *open* question: unlike [`Item`], an open row
/// writes directly to its own string variable rather than indirecting
/// through a [`ResponseDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    pub uid: String,
    pub headers: Vec<Header>,
    pub var_ref: VarRef,
    pub attached_opens: Vec<AttachedOpen>,
}

/// The container describing how a question's answers are shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseDomain {
    SingleChoice {
        uid: String,
        var_ref: VarRef,
        subtype: SingleChoiceSubtype,
        options: Vec<AnswerOption>,
    },
    MultipleChoice {
        uid: String,
        options: Vec<AnswerOption>,
    },
    Matrix {
        uid: String,
        items: Vec<Item>,
    },
}

impl ResponseDomain {
    pub fn uid(&self) -> &str {
        match self {
            ResponseDomain::SingleChoice { uid, .. } => uid,
            ResponseDomain::MultipleChoice { uid, .. } => uid,
            ResponseDomain::Matrix { uid, .. } => uid,
        }
    }
}

/// A question within a page body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Question {
    Open {
        headers: Vec<Header>,
        var_ref: VarRef,
        attached_opens: Vec<AttachedOpen>,
    },
    SingleChoice {
        headers: Vec<Header>,
        domain: ResponseDomain,
    },
    MultipleChoice {
        headers: Vec<Header>,
        domain: ResponseDomain,
    },
    MatrixSingleChoice {
        headers: Vec<Header>,
        domain: ResponseDomain,
    },
    MatrixMultipleChoice {
        headers: Vec<Header>,
        domain: ResponseDomain,
    },
    MatrixOpen {
        headers: Vec<Header>,
        items: Vec<OpenItem>,
    },
    Episodes {
        headers: Vec<Header>,
    },
    EpisodesTable {
        headers: Vec<Header>,
    },
}

impl Question {
    pub fn tag_name(&self) -> &'static str {
        match self {
            Question::Open { .. } => "questionOpen",
            Question::SingleChoice { .. } => "questionSingleChoice",
            Question::MultipleChoice { .. } => "multipleChoice",
            Question::MatrixSingleChoice { .. } => "matrixQuestionSingleChoice",
            Question::MatrixMultipleChoice { .. } => "matrixQuestionMultipleChoice",
            Question::MatrixOpen { .. } => "matrixQuestionOpen",
            Question::Episodes { .. } => "episodes",
            Question::EpisodesTable { .. } => "episodesTable",
        }
    }

    pub fn headers(&self) -> &[Header] {
        match self {
            Question::Open { headers, .. }
            | Question::SingleChoice { headers, .. }
            | Question::MultipleChoice { headers, .. }
            | Question::MatrixSingleChoice { headers, .. }
            | Question::MatrixMultipleChoice { headers, .. }
            | Question::MatrixOpen { headers, .. }
            | Question::Episodes { headers }
            | Question::EpisodesTable { headers } => headers,
        }
    }
}
