//! Variable reconciliation and dead-end page analysis (spec §4.D).
//!
//! Every public function here is a pure read over a [`Questionnaire`]; none
//! of them mutate it beyond the warnings already recorded by the reader.
//! Results that accumulate from unordered sets are always sorted, so that
//! two reads of byte-identical input produce byte-identical reports.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Warning;
use crate::model::{Questionnaire, VariableType};

/// One section of an analyzer report: a title, an optional prose
/// description, and exactly one body shape. Replaces the free-form nested
/// mapping a duck-typed report would use (§9 Design Note).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub description: Option<String>,
    pub body: ReportBody,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, body: ReportBody) -> Self {
        Self {
            title: title.into(),
            description: None,
            body,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The one of four shapes a report section's content takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Scalar(String),
    List(Vec<String>),
    Table(Vec<Vec<String>>),
    Code(String),
}

/// An ordered sequence of [`ReportSection`]s: the full output of one
/// analyzer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn push(&mut self, section: ReportSection) -> &mut Self {
        self.sections.push(section);
        self
    }
}

/// `all_vars_declared`: every declared variable's name and type, in
/// declaration order.
pub fn all_vars_declared(questionnaire: &Questionnaire) -> Vec<(String, VariableType)> {
    questionnaire
        .declared_variables
        .values()
        .map(|v| (v.name.clone(), v.var_type))
        .collect()
}

/// `all_page_body_vars`: every variable name referenced from a page body,
/// with its inferred type. When the same name is inferred with two
/// different types across pages, the first type encountered wins.
pub fn all_page_body_vars(questionnaire: &Questionnaire) -> IndexMap<String, VariableType> {
    let mut out: IndexMap<String, VariableType> = IndexMap::new();
    for page in &questionnaire.pages {
        for (name, var_type) in &page.inferred_var_types {
            out.entry(name.clone()).or_insert(*var_type);
        }
        // Trigger-only variables carry no question-shape context to infer
        // a type from; they are recorded as `string`, the same default the
        // reader gives a preload.
        for name in &page.triggers_vars_explicit {
            out.entry(name.clone()).or_insert(VariableType::String);
        }
    }
    out
}

/// Every name whose inferred type differs between two pages, as the
/// non-fatal counterpart to the reader's fatal same-page
/// `InconsistentInferredType` check (spec's Invariant: "Any later
/// discovery of a different type for the same name is a typed warning,
/// never a silent overwrite"). `all_page_body_vars` keeps the first type
/// seen; this reports every later page whose inferred type disagrees with
/// it, so the discard is never silent.
pub fn cross_page_type_conflicts(questionnaire: &Questionnaire) -> Vec<Warning> {
    let mut first_seen: IndexMap<String, VariableType> = IndexMap::new();
    let mut warnings = Vec::new();
    for page in &questionnaire.pages {
        for (name, var_type) in &page.inferred_var_types {
            match first_seen.get(name) {
                Some(first_type) if first_type != var_type => {
                    warnings.push(Warning::InferredTypeVariesAcrossPages {
                        name: name.clone(),
                        first_type: first_type.as_str().to_string(),
                        other_type: var_type.as_str().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    first_seen.insert(name.clone(), *var_type);
                }
            }
        }
    }
    warnings
}

/// Every transition or jumper target that does not resolve to a page in
/// this questionnaire.
pub fn unresolved_targets(questionnaire: &Questionnaire) -> Vec<Warning> {
    let known: std::collections::HashSet<&str> =
        questionnaire.pages.iter().map(|p| p.uid.as_str()).collect();
    let mut warnings = Vec::new();
    for page in &questionnaire.pages {
        for transition in &page.transitions {
            if !known.contains(transition.target_uid.as_str()) {
                warnings.push(Warning::UnresolvedTarget {
                    from_page: page.uid.clone(),
                    target: transition.target_uid.clone(),
                });
            }
        }
        for jumper in &page.jumpers {
            if !known.contains(jumper.target.as_str()) {
                warnings.push(Warning::UnresolvedTarget {
                    from_page: page.uid.clone(),
                    target: jumper.target.clone(),
                });
            }
        }
    }
    warnings
}

/// Declared but never referenced from any page body.
pub fn vars_declared_not_used(questionnaire: &Questionnaire) -> Vec<String> {
    let used = all_page_body_vars(questionnaire);
    let mut out: Vec<String> = questionnaire
        .declared_variables
        .keys()
        .filter(|name| !used.contains_key(*name))
        .cloned()
        .collect();
    out.sort();
    out
}

/// Referenced from a page body but never declared.
pub fn vars_used_not_declared(questionnaire: &Questionnaire) -> Vec<String> {
    let mut out: Vec<String> = all_page_body_vars(questionnaire)
        .keys()
        .filter(|name| !questionnaire.declared_variables.contains_key(*name))
        .cloned()
        .collect();
    out.sort();
    out
}

/// A variable whose declared type differs from its inferred-from-use type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InconsistentVariable {
    pub name: String,
    pub declared_type: VariableType,
    pub inferred_type: VariableType,
}

/// Names whose inferred type (from body usage) differs from their declared
/// type.
pub fn vars_declared_used_inconsistent(questionnaire: &Questionnaire) -> Vec<InconsistentVariable> {
    let used = all_page_body_vars(questionnaire);
    let mut out: Vec<InconsistentVariable> = questionnaire
        .declared_variables
        .values()
        .filter_map(|declared| {
            used.get(&declared.name).and_then(|inferred| {
                (*inferred != declared.var_type).then(|| InconsistentVariable {
                    name: declared.name.clone(),
                    declared_type: declared.var_type,
                    inferred_type: *inferred,
                })
            })
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Result of the transition-graph dead-end analysis (§4.D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeadEndPages {
    pub all_pages: Vec<String>,
    pub targets_not_found: Vec<String>,
    pub lost_pages: Vec<String>,
    pub only_false_conditions: Vec<String>,
}

/// Derive the dead-end classification straight from the model's page and
/// transition lists, with no dependency on the graph layer.
pub fn dead_end_pages(questionnaire: &Questionnaire) -> DeadEndPages {
    let mut all_pages: Vec<String> = questionnaire.pages.iter().map(|p| p.uid.clone()).collect();
    all_pages.sort();

    let known: std::collections::HashSet<&str> =
        questionnaire.pages.iter().map(|p| p.uid.as_str()).collect();

    let mut targets_not_found: Vec<String> = questionnaire
        .pages
        .iter()
        .flat_map(|p| p.transitions.iter())
        .filter(|t| !known.contains(t.target_uid.as_str()))
        .map(|t| t.target_uid.clone())
        .collect();
    targets_not_found.sort();
    targets_not_found.dedup();

    let mut pointed_to: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut only_false: IndexMap<&str, bool> = IndexMap::new();
    for page in &questionnaire.pages {
        for transition in &page.transitions {
            if !known.contains(transition.target_uid.as_str()) {
                continue;
            }
            pointed_to.insert(transition.target_uid.as_str());
            let entry = only_false.entry(transition.target_uid.as_str()).or_insert(true);
            *entry = *entry && transition.is_literally_false();
        }
    }

    let mut lost_pages: Vec<String> = questionnaire
        .pages
        .iter()
        .filter(|p| !pointed_to.contains(p.uid.as_str()))
        .map(|p| p.uid.clone())
        .collect();
    lost_pages.sort();

    let mut only_false_conditions: Vec<String> = only_false
        .iter()
        .filter(|(_, all_false)| **all_false)
        .map(|(uid, _)| uid.to_string())
        .collect();
    only_false_conditions.sort();

    DeadEndPages {
        all_pages,
        targets_not_found,
        lost_pages,
        only_false_conditions,
    }
}

/// Run every reconciliation and dead-end check and assemble the combined
/// [`Report`] the CLI's `analyze` subcommand serializes.
pub fn analyze(questionnaire: &Questionnaire) -> Report {
    let mut report = Report::default();

    report.push(ReportSection::new(
        "declared variables",
        ReportBody::Table(
            all_vars_declared(questionnaire)
                .into_iter()
                .map(|(name, ty)| vec![name, ty.as_str().to_string()])
                .collect(),
        ),
    ));

    report.push(
        ReportSection::new(
            "declared, not used",
            ReportBody::List(vars_declared_not_used(questionnaire)),
        )
        .with_description("declared variables never referenced from a page body"),
    );

    report.push(
        ReportSection::new(
            "used, not declared",
            ReportBody::List(vars_used_not_declared(questionnaire)),
        )
        .with_description("variables referenced from a page body with no matching declaration"),
    );

    report.push(
        ReportSection::new(
            "declared/used type mismatch",
            ReportBody::Table(
                vars_declared_used_inconsistent(questionnaire)
                    .into_iter()
                    .map(|v| {
                        vec![
                            v.name,
                            v.declared_type.as_str().to_string(),
                            v.inferred_type.as_str().to_string(),
                        ]
                    })
                    .collect(),
            ),
        ),
    );

    let dead_ends = dead_end_pages(questionnaire);
    report.push(ReportSection::new(
        "dead-end pages",
        ReportBody::Table(vec![
            vec!["targets not found".to_string(), dead_ends.targets_not_found.join(", ")],
            vec!["lost pages".to_string(), dead_ends.lost_pages.join(", ")],
            vec![
                "only-false targets".to_string(),
                dead_ends.only_false_conditions.join(", "),
            ],
        ]),
    ));

    if !questionnaire.warnings.is_empty() {
        report.push(ReportSection::new(
            "warnings",
            ReportBody::List(questionnaire.warnings.iter().map(|w| w.to_string()).collect()),
        ));
    }

    tracing::info!(sections = report.sections.len(), "analyzer report built");
    report
}
