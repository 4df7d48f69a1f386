//! Reads a questionnaire document into the typed model (spec §4.B).
//!
//! The byte stream is parsed once into an [`XmlNode`] tree (§4.B design:
//! "retains a deep copy of the root for downstream attribute-harvesting
//! passes"), then walked several times — once per page for transitions,
//! jumpers, triggers, and body variables/questions — rather than driving a
//! single hand-rolled state machine over streaming events.

use indexmap::IndexMap;

use crate::error::{QflowError, Result, Warning};
use crate::model::{
    AnswerOption, AttachedOpen, Header, HeaderKind, Item, Jumper, OpenItem, Page, Question,
    Questionnaire, ResponseDomain, ScriptItem, SingleChoiceSubtype, Transition, Trigger,
    TriggerDirection, TriggerRedirect, VarRef, Variable, VariableType, PRELOAD_VARIABLE_PREFIX,
};
use crate::scanner;

use super::constants::*;
use super::tree::XmlNode;

/// Parse a complete questionnaire document from its XML text.
pub fn read_questionnaire(xml: &str) -> Result<Questionnaire> {
    let root = super::tree::parse_document(xml)?;
    tracing::debug!(root_tag = %root.local_name, "parsed questionnaire document");

    let name = root
        .first_child_named(TAG_NAME)
        .map(|n| n.text.trim().to_string());

    let declared_variables = read_declared_variables(&root);

    let mut warnings = Vec::new();
    let mut pages = Vec::new();
    for page_node in root.children_named(TAG_PAGE) {
        let page = read_page(page_node, &mut warnings)?;
        tracing::debug!(uid = %page.uid, "parsed page");
        pages.push(page);
    }

    let mut questionnaire = Questionnaire::new(name, declared_variables, pages);
    questionnaire.warnings = warnings;
    apply_reconciliation_warnings(&mut questionnaire);
    Ok(questionnaire)
}

fn read_declared_variables(root: &XmlNode) -> IndexMap<String, Variable> {
    let mut vars = IndexMap::new();

    if let Some(preloads) = root.first_child_named(TAG_PRELOADS) {
        for item in preloads.children_named(TAG_PRELOAD_ITEM) {
            if let Some(raw) = item.attr(ATTR_VARIABLE) {
                let name = format!("{PRELOAD_VARIABLE_PREFIX}{raw}");
                vars.insert(name.clone(), Variable::new(name, VariableType::String));
            }
        }
    }

    if let Some(variables) = root.first_child_named(TAG_VARIABLES) {
        for var_node in variables.children_named(TAG_VARIABLE) {
            let (Some(name), Some(type_raw)) =
                (var_node.attr(ATTR_NAME), var_node.attr(ATTR_TYPE))
            else {
                continue;
            };
            let var_type = parse_variable_type(type_raw).unwrap_or(VariableType::String);
            vars.insert(name.to_string(), Variable::new(name, var_type));
        }
    }

    vars
}

fn parse_variable_type(raw: &str) -> Option<VariableType> {
    match raw {
        "singleChoiceAnswerOption" => Some(VariableType::SingleChoiceAnswerOption),
        "boolean" => Some(VariableType::Boolean),
        "string" => Some(VariableType::String),
        "number" => Some(VariableType::Number),
        _ => None,
    }
}

fn read_page(page_node: &XmlNode, warnings: &mut Vec<Warning>) -> Result<Page> {
    let uid = page_node
        .attr(ATTR_UID)
        .ok_or(QflowError::MissingAttribute {
            element: "page",
            attribute: "uid",
        })?
        .to_string();

    let mut page = Page::new(uid.clone());

    if let Some(transitions_node) = page_node.first_child_named(TAG_TRANSITIONS) {
        for t in transitions_node.children_named(TAG_TRANSITION) {
            let target = t.attr(ATTR_TARGET).ok_or(QflowError::MissingAttribute {
                element: "transition",
                attribute: "target",
            })?;
            page.transitions.push(Transition::new(
                target,
                t.attr(ATTR_CONDITION).map(|s| s.to_string()),
            ));
        }
    }

    for jumper_node in page_node.descendants() {
        if jumper_node.is_tag(TAG_JUMPER) {
            let (Some(value), Some(target)) =
                (jumper_node.attr(ATTR_VALUE), jumper_node.attr(ATTR_TARGET))
            else {
                continue;
            };
            page.jumpers.push(Jumper::new(value, target));
        }
    }

    if let Some(triggers_node) = page_node.first_child_named(TAG_TRIGGERS) {
        read_triggers(triggers_node, &uid, &mut page, warnings)?;
    }

    if let Some(body_node) = page_node.first_child_named(TAG_BODY) {
        read_body(body_node, &uid, &mut page)?;
    }

    page.visible_conditions = collect_visible_conditions(page_node);

    page.trig_redirect_on_exit_true =
        crate::redirect::resolve_redirects(&page.triggers, true);
    page.trig_redirect_on_exit_false =
        crate::redirect::resolve_redirects(&page.triggers, false);

    Ok(page)
}

fn read_triggers(
    triggers_node: &XmlNode,
    page_uid: &str,
    page: &mut Page,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    for child in &triggers_node.children {
        if child.namespace != super::tree::Namespace::Questionnaire {
            continue;
        }
        let condition = child
            .attr(ATTR_CONDITION)
            .unwrap_or(Trigger::DEFAULT_CONDITION)
            .to_string();
        let on_exit = Trigger::parse_on_exit(child.attr(ATTR_ON_EXIT));
        let direction = TriggerDirection::parse(child.attr(ATTR_DIRECTION).unwrap_or("forward"));

        let trigger = match child.local_name.as_str() {
            TAG_ACTION => {
                let command = child
                    .attr(ATTR_COMMAND)
                    .ok_or(QflowError::MissingAttribute {
                        element: "action",
                        attribute: "command",
                    })?
                    .to_string();
                let script_items = child
                    .children_named(TAG_SCRIPT_ITEM)
                    .map(|s| ScriptItem {
                        value: s.attr(ATTR_VALUE).unwrap_or_default().to_string(),
                    })
                    .collect();

                for script in &script_items {
                    page.triggers_vars_implicit
                        .extend(scanner::scan_set_variable_value(&script.value));
                    if on_exit {
                        page.triggers_json_save
                            .extend(scanner::scan_to_persist(&script.value));
                    } else {
                        page.triggers_json_load
                            .extend(scanner::scan_to_load(&script.value));
                        page.triggers_json_reset
                            .extend(scanner::scan_to_reset(&script.value));
                    }
                }

                Trigger::Action {
                    command,
                    script_items,
                    condition,
                    on_exit,
                    direction,
                }
            }
            TAG_VARIABLE => {
                let variable = child.attr(ATTR_VARIABLE).unwrap_or_default().to_string();
                let value = child.attr(ATTR_VALUE).unwrap_or_default().to_string();
                page.triggers_vars_explicit.push(variable.clone());
                Trigger::Variable {
                    variable,
                    value,
                    condition,
                    on_exit,
                    direction,
                }
            }
            TAG_JS_CHECK => {
                let variable = child.attr(ATTR_VARIABLE).unwrap_or_default().to_string();
                let xvar = child.attr(ATTR_XVAR).unwrap_or_default().to_string();
                let yvar = child.attr(ATTR_YVAR).unwrap_or_default().to_string();
                page.triggers_vars_explicit.push(variable.clone());
                page.triggers_vars_explicit.push(xvar.clone());
                page.triggers_vars_explicit.push(yvar.clone());
                Trigger::JsCheck {
                    variable,
                    xvar,
                    yvar,
                    condition,
                    on_exit,
                    direction,
                }
            }
            other => {
                tracing::warn!(page = %page_uid, tag = %other, "skipping unknown trigger tag");
                warnings.push(Warning::UnknownTriggerTag {
                    page: page_uid.to_string(),
                    tag: other.to_string(),
                });
                continue;
            }
        };
        page.triggers.push(trigger);
    }
    Ok(())
}

fn collect_visible_conditions(node: &XmlNode) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(v) = node.attr(ATTR_VISIBLE) {
        out.push(v.to_string());
    }
    for child in node.descendants() {
        if let Some(v) = child.attr(ATTR_VISIBLE) {
            out.push(v.to_string());
        }
    }
    out
}

fn read_body(body_node: &XmlNode, page_uid: &str, page: &mut Page) -> Result<()> {
    let mut seen_vars: IndexMap<String, VariableType> = IndexMap::new();
    read_body_children(body_node, page_uid, page, &mut seen_vars, &[])?;
    page.inferred_var_types = seen_vars;
    Ok(())
}

/// Push `node`'s own `visible`/`condition` attribute, if it has one, onto a
/// path accumulated outer-to-inner while descending the body tree.
fn push_condition(path: &mut Vec<String>, node: &XmlNode) {
    if let Some(c) = node.attr(ATTR_VISIBLE).or_else(|| node.attr(ATTR_CONDITION)) {
        path.push(c.to_string());
    }
}

/// A path accumulated outer-to-inner (page toward the reference) read back
/// innermost-first, as spec §3's `VarRef::condition` requires.
fn innermost_first(path: &[String]) -> Vec<String> {
    path.iter().rev().cloned().collect()
}

fn read_body_children(
    container: &XmlNode,
    page_uid: &str,
    page: &mut Page,
    seen_vars: &mut IndexMap<String, VariableType>,
    ancestors: &[String],
) -> Result<()> {
    for child in &container.children {
        if child.namespace != super::tree::Namespace::Questionnaire {
            continue;
        }
        match child.local_name.as_str() {
            TAG_SECTION => {
                let mut extended = ancestors.to_vec();
                push_condition(&mut extended, child);
                read_body_children(child, page_uid, page, seen_vars, &extended)?;
            }
            TAG_HEADER_TITLE | TAG_HEADER_TEXT | TAG_HEADER_QUESTION | TAG_HEADER_INTRODUCTION
            | TAG_HEADER_INSTRUCTION => {
                page.headers.push(parse_header(child));
            }
            tag if QUESTION_TAGS.contains(&tag) => {
                let question = parse_question(child, page_uid, seen_vars, ancestors)?;
                page.body_question_order.push(question.tag_name());
                collect_question_var_refs(&question, &mut page.body_var_refs);
                page.questions.push(question);
            }
            TAG_ATTACHED_OPEN => {
                page.attached_opens.push(parse_attached_open(child));
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_header(node: &XmlNode) -> Header {
    let kind = match node.local_name.as_str() {
        TAG_HEADER_TITLE => HeaderKind::Title,
        TAG_HEADER_TEXT => HeaderKind::Text,
        TAG_HEADER_QUESTION => HeaderKind::Question,
        TAG_HEADER_INTRODUCTION => HeaderKind::Introduction,
        _ => HeaderKind::Instruction,
    };
    Header {
        kind,
        uid: node.attr(ATTR_UID).unwrap_or_default().to_string(),
        visible: node.attr(ATTR_VISIBLE).map(|s| s.to_string()),
        block: node.attr(ATTR_BLOCK).map(|s| s.to_string()),
        content: node.text.trim().to_string(),
    }
}

fn parse_attached_open(node: &XmlNode) -> AttachedOpen {
    AttachedOpen {
        uid: node.attr(ATTR_UID).unwrap_or_default().to_string(),
        variable: node.attr(ATTR_VARIABLE).unwrap_or_default().to_string(),
        visible: node.attr(ATTR_VISIBLE).map(|s| s.to_string()),
    }
}

fn collect_headers(node: &XmlNode) -> Vec<Header> {
    node.children
        .iter()
        .filter(|c| {
            matches!(
                c.local_name.as_str(),
                TAG_HEADER_TITLE
                    | TAG_HEADER_TEXT
                    | TAG_HEADER_QUESTION
                    | TAG_HEADER_INTRODUCTION
                    | TAG_HEADER_INSTRUCTION
            )
        })
        .map(parse_header)
        .collect()
}

fn parse_answer_option(node: &XmlNode, multiple_choice: bool, ancestors: &[String]) -> AnswerOption {
    let uid = node.attr(ATTR_UID).unwrap_or_default().to_string();
    let label = node.attr(ATTR_LABEL).unwrap_or_default().to_string();
    let visible = node.attr(ATTR_VISIBLE).map(|s| s.to_string());
    let missing = node.attr(ATTR_MISSING) == Some("true");
    let attached_opens = node
        .children_named(TAG_ATTACHED_OPEN)
        .map(parse_attached_open)
        .collect();

    if multiple_choice {
        let mut path = ancestors.to_vec();
        push_condition(&mut path, node);
        AnswerOption::MultipleChoice {
            uid,
            var_ref: VarRef::with_condition(
                node.attr(ATTR_VARIABLE).unwrap_or_default(),
                innermost_first(&path),
            ),
            exclusive: node.attr(ATTR_EXCLUSIVE) == Some("true"),
            label,
            visible,
            missing,
            attached_opens,
        }
    } else {
        AnswerOption::SingleChoice {
            uid,
            value: node.attr(ATTR_VALUE).unwrap_or_default().to_string(),
            label,
            visible,
            missing,
            attached_opens,
        }
    }
}

fn parse_single_choice_domain(rd: &XmlNode, ancestors: &[String]) -> ResponseDomain {
    let mut path = ancestors.to_vec();
    push_condition(&mut path, rd);
    ResponseDomain::SingleChoice {
        uid: rd.attr(ATTR_UID).unwrap_or_default().to_string(),
        var_ref: VarRef::with_condition(rd.attr(ATTR_VARIABLE).unwrap_or_default(), innermost_first(&path)),
        subtype: SingleChoiceSubtype::parse(rd.attr(ATTR_TYPE).unwrap_or_default()),
        options: rd
            .children_named(TAG_ANSWER_OPTION)
            .map(|ao| parse_answer_option(ao, false, &path))
            .collect(),
    }
}

fn parse_multiple_choice_domain(rd: &XmlNode, ancestors: &[String]) -> ResponseDomain {
    let mut path = ancestors.to_vec();
    push_condition(&mut path, rd);
    ResponseDomain::MultipleChoice {
        uid: rd.attr(ATTR_UID).unwrap_or_default().to_string(),
        options: rd
            .children_named(TAG_ANSWER_OPTION)
            .map(|ao| parse_answer_option(ao, true, &path))
            .collect(),
    }
}

enum MatrixKind {
    SingleChoice,
    MultipleChoice,
}

fn parse_matrix_domain(rd: &XmlNode, kind: MatrixKind, ancestors: &[String]) -> ResponseDomain {
    let mut domain_path = ancestors.to_vec();
    push_condition(&mut domain_path, rd);

    let items = rd
        .children_named(TAG_ITEM)
        .map(|item_node| {
            let mut item_path = domain_path.clone();
            push_condition(&mut item_path, item_node);

            let headers = collect_headers(item_node);
            let attached_opens = item_node
                .children_named(TAG_ATTACHED_OPEN)
                .map(parse_attached_open)
                .collect();
            let domain = match item_node.first_child_named(TAG_RESPONSE_DOMAIN) {
                Some(inner) => match kind {
                    MatrixKind::SingleChoice => parse_single_choice_domain(inner, &item_path),
                    MatrixKind::MultipleChoice => parse_multiple_choice_domain(inner, &item_path),
                },
                None => match kind {
                    MatrixKind::SingleChoice => ResponseDomain::SingleChoice {
                        uid: String::new(),
                        var_ref: VarRef::new(""),
                        subtype: SingleChoiceSubtype::Plain,
                        options: Vec::new(),
                    },
                    MatrixKind::MultipleChoice => ResponseDomain::MultipleChoice {
                        uid: String::new(),
                        options: Vec::new(),
                    },
                },
            };
            Item {
                uid: item_node.attr(ATTR_UID).unwrap_or_default().to_string(),
                headers,
                domain: Box::new(domain),
                attached_opens,
            }
        })
        .collect();

    ResponseDomain::Matrix {
        uid: rd.attr(ATTR_UID).unwrap_or_default().to_string(),
        items,
    }
}

fn question_variable_type(tag: &str) -> VariableType {
    match tag {
        TAG_QUESTION_SINGLE_CHOICE | TAG_MATRIX_SINGLE_CHOICE => {
            VariableType::SingleChoiceAnswerOption
        }
        TAG_MULTIPLE_CHOICE | TAG_MATRIX_MULTIPLE_CHOICE => VariableType::Boolean,
        _ => VariableType::String,
    }
}

fn parse_question(
    node: &XmlNode,
    page_uid: &str,
    seen_vars: &mut IndexMap<String, VariableType>,
    ancestors: &[String],
) -> Result<Question> {
    let tag = node.local_name.as_str();
    let headers = collect_headers(node);

    let mut path = ancestors.to_vec();
    push_condition(&mut path, node);

    let question = match tag {
        TAG_QUESTION_OPEN => {
            let rd_node = node.first_child_named(TAG_RESPONSE_DOMAIN);
            let variable = node
                .attr(ATTR_VARIABLE)
                .or_else(|| rd_node.and_then(|n| n.attr(ATTR_VARIABLE)))
                .unwrap_or_default();
            let mut var_path = path.clone();
            if let Some(rd) = rd_node {
                push_condition(&mut var_path, rd);
            }
            Question::Open {
                headers,
                var_ref: VarRef::with_condition(variable, innermost_first(&var_path)),
                attached_opens: node
                    .children_named(TAG_ATTACHED_OPEN)
                    .map(parse_attached_open)
                    .collect(),
            }
        }
        TAG_QUESTION_SINGLE_CHOICE => {
            let domain = node
                .first_child_named(TAG_RESPONSE_DOMAIN)
                .map(|rd| parse_single_choice_domain(rd, &path))
                .unwrap_or(ResponseDomain::SingleChoice {
                    uid: String::new(),
                    var_ref: VarRef::new(""),
                    subtype: SingleChoiceSubtype::Plain,
                    options: Vec::new(),
                });
            Question::SingleChoice { headers, domain }
        }
        TAG_MULTIPLE_CHOICE => {
            let domain = node
                .first_child_named(TAG_RESPONSE_DOMAIN)
                .map(|rd| parse_multiple_choice_domain(rd, &path))
                .unwrap_or(ResponseDomain::MultipleChoice {
                    uid: String::new(),
                    options: Vec::new(),
                });
            Question::MultipleChoice { headers, domain }
        }
        TAG_MATRIX_SINGLE_CHOICE => {
            let domain = node
                .first_child_named(TAG_RESPONSE_DOMAIN)
                .map(|rd| parse_matrix_domain(rd, MatrixKind::SingleChoice, &path))
                .unwrap_or(ResponseDomain::Matrix {
                    uid: String::new(),
                    items: Vec::new(),
                });
            Question::MatrixSingleChoice { headers, domain }
        }
        TAG_MATRIX_MULTIPLE_CHOICE => {
            let domain = node
                .first_child_named(TAG_RESPONSE_DOMAIN)
                .map(|rd| parse_matrix_domain(rd, MatrixKind::MultipleChoice, &path))
                .unwrap_or(ResponseDomain::Matrix {
                    uid: String::new(),
                    items: Vec::new(),
                });
            Question::MatrixMultipleChoice { headers, domain }
        }
        TAG_MATRIX_OPEN => {
            let items = node
                .children_named(TAG_ITEM)
                .map(|item_node| {
                    let mut item_path = path.clone();
                    push_condition(&mut item_path, item_node);
                    OpenItem {
                        uid: item_node.attr(ATTR_UID).unwrap_or_default().to_string(),
                        headers: collect_headers(item_node),
                        var_ref: VarRef::with_condition(
                            item_node.attr(ATTR_VARIABLE).unwrap_or_default(),
                            innermost_first(&item_path),
                        ),
                        attached_opens: item_node
                            .children_named(TAG_ATTACHED_OPEN)
                            .map(parse_attached_open)
                            .collect(),
                    }
                })
                .collect();
            Question::MatrixOpen { headers, items }
        }
        TAG_EPISODES => Question::Episodes { headers },
        _ => Question::EpisodesTable { headers },
    };

    check_variable_consistency(node, page_uid, tag, seen_vars)?;
    Ok(question)
}

/// Enforce §4.B.6: the same variable name under two incompatible question
/// shapes within one page is fatal, unless one side is a compatible
/// attached-open string use.
fn check_variable_consistency(
    node: &XmlNode,
    page_uid: &str,
    tag: &str,
    seen_vars: &mut IndexMap<String, VariableType>,
) -> Result<()> {
    let this_type = question_variable_type(tag);
    for descendant in std::iter::once(node).chain(node.descendants()) {
        // Attached-open variables always write a string and never conflict
        // with their enclosing question's own variable — they are a
        // compatible secondary use, not a competing shape.
        if descendant.is_tag(TAG_ATTACHED_OPEN) {
            continue;
        }
        if let Some(name) = descendant.attr(ATTR_VARIABLE) {
            match seen_vars.get(name).copied() {
                Some(prior) if prior != this_type => {
                    return Err(QflowError::InconsistentInferredType {
                        name: name.to_string(),
                        page: page_uid.to_string(),
                        first_type: prior.as_str(),
                        second_type: this_type.as_str(),
                    });
                }
                _ => {
                    seen_vars.insert(name.to_string(), this_type);
                }
            }
        }
    }
    Ok(())
}

fn collect_question_var_refs(question: &Question, out: &mut Vec<VarRef>) {
    match question {
        Question::Open { var_ref, .. } => out.push(var_ref.clone()),
        Question::SingleChoice { domain, .. }
        | Question::MultipleChoice { domain, .. }
        | Question::MatrixSingleChoice { domain, .. }
        | Question::MatrixMultipleChoice { domain, .. } => collect_domain_var_refs(domain, out),
        Question::MatrixOpen { items, .. } => {
            for item in items {
                out.push(item.var_ref.clone());
            }
        }
        Question::Episodes { .. } | Question::EpisodesTable { .. } => {}
    }
}

fn collect_domain_var_refs(domain: &ResponseDomain, out: &mut Vec<VarRef>) {
    match domain {
        ResponseDomain::SingleChoice { var_ref, .. } => out.push(var_ref.clone()),
        ResponseDomain::MultipleChoice { options, .. } => {
            for opt in options {
                if let AnswerOption::MultipleChoice { var_ref, .. } = opt {
                    out.push(var_ref.clone());
                }
            }
        }
        ResponseDomain::Matrix { items, .. } => {
            for item in items {
                collect_domain_var_refs(&item.domain, out);
            }
        }
    }
}

/// Runs the cross-page reconciliation checks that need every page already
/// built (§4.D): a same-name variable inferred with two different types
/// across pages, and a transition/jumper target that resolves to no page.
/// Kept separate from the analyzer's `all_page_body_vars`/`dead_end_pages`,
/// which stay pure reads over an already-built `Questionnaire` and never
/// decide `vars_declared_not_used` / `vars_used_not_declared` themselves.
fn apply_reconciliation_warnings(questionnaire: &mut Questionnaire) {
    let mut warnings = crate::analyzer::cross_page_type_conflicts(questionnaire);
    warnings.extend(crate::analyzer::unresolved_targets(questionnaire));
    warnings.extend(
        crate::analyzer::vars_declared_used_inconsistent(questionnaire)
            .into_iter()
            .map(|v| Warning::DeclaredTypeMismatch {
                name: v.name,
                declared_type: v.declared_type.as_str().to_string(),
                inferred_type: v.inferred_type.as_str().to_string(),
            }),
    );
    questionnaire.warnings.extend(warnings);
}
