//! Namespace and element-name constants recognized by the reader and
//! generator (spec §3, §6).

/// The questionnaire namespace. All recognized elements in §6 are matched
/// under this URI.
pub const Q_NS: &str = "urn:qflow:questionnaire";

/// The optional display-text namespace (used by a secondary display tag).
pub const D_NS: &str = "urn:qflow:display";

pub const TAG_QUESTIONNAIRE: &str = "questionnaire";
pub const TAG_NAME: &str = "name";
pub const TAG_PRELOADS: &str = "preloads";
pub const TAG_PRELOAD_ITEM: &str = "preloadItem";
pub const TAG_VARIABLES: &str = "variables";
pub const TAG_VARIABLE: &str = "variable";
pub const TAG_PAGE: &str = "page";
pub const TAG_BODY: &str = "body";
pub const TAG_SECTION: &str = "section";

pub const TAG_HEADER_TITLE: &str = "title";
pub const TAG_HEADER_TEXT: &str = "text";
pub const TAG_HEADER_QUESTION: &str = "question";
pub const TAG_HEADER_INTRODUCTION: &str = "introduction";
pub const TAG_HEADER_INSTRUCTION: &str = "instruction";

pub const TAG_RESPONSE_DOMAIN: &str = "responseDomain";
pub const TAG_ANSWER_OPTION: &str = "answerOption";
pub const TAG_ITEM: &str = "item";
pub const TAG_ATTACHED_OPEN: &str = "attachedOpen";

pub const TAG_QUESTION_OPEN: &str = "questionOpen";
pub const TAG_QUESTION_SINGLE_CHOICE: &str = "questionSingleChoice";
pub const TAG_MULTIPLE_CHOICE: &str = "multipleChoice";
pub const TAG_MATRIX_SINGLE_CHOICE: &str = "matrixQuestionSingleChoice";
pub const TAG_MATRIX_MULTIPLE_CHOICE: &str = "matrixQuestionMultipleChoice";
pub const TAG_MATRIX_OPEN: &str = "matrixQuestionOpen";
pub const TAG_EPISODES: &str = "episodes";
pub const TAG_EPISODES_TABLE: &str = "episodesTable";

pub const QUESTION_TAGS: &[&str] = &[
    TAG_QUESTION_OPEN,
    TAG_QUESTION_SINGLE_CHOICE,
    TAG_MULTIPLE_CHOICE,
    TAG_MATRIX_SINGLE_CHOICE,
    TAG_MATRIX_MULTIPLE_CHOICE,
    TAG_MATRIX_OPEN,
    TAG_EPISODES,
    TAG_EPISODES_TABLE,
];

pub const TAG_TRANSITIONS: &str = "transitions";
pub const TAG_TRANSITION: &str = "transition";
pub const TAG_JUMPER: &str = "jumper";
pub const TAG_TRIGGERS: &str = "triggers";
pub const TAG_ACTION: &str = "action";
pub const TAG_SCRIPT_ITEM: &str = "scriptItem";
pub const TAG_JS_CHECK: &str = "jsCheck";

pub const ATTR_UID: &str = "uid";
pub const ATTR_VISIBLE: &str = "visible";
pub const ATTR_BLOCK: &str = "block";
pub const ATTR_CONDITION: &str = "condition";
pub const ATTR_TARGET: &str = "target";
pub const ATTR_VALUE: &str = "value";
pub const ATTR_VARIABLE: &str = "variable";
pub const ATTR_NAME: &str = "name";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_LABEL: &str = "label";
pub const ATTR_MISSING: &str = "missing";
pub const ATTR_EXCLUSIVE: &str = "exclusive";
pub const ATTR_COMMAND: &str = "command";
pub const ATTR_ON_EXIT: &str = "onExit";
pub const ATTR_DIRECTION: &str = "direction";
pub const ATTR_XVAR: &str = "xvar";
pub const ATTR_YVAR: &str = "yvar";
pub const ATTR_ITEM_CLASSES: &str = "itemClasses";
pub const ATTR_NO_RESPONSE_OPTIONS: &str = "noResponseOptions";
