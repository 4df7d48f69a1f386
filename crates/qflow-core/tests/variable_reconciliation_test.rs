//! Properties 3 and 4: declared-vs-used disjointness and type-inference
//! soundness, exercised from parsed XML through the analyzer.

use qflow_core::analyzer;
use qflow_core::model::VariableType;
use qflow_core::Warning;

const NS: &str = "urn:qflow:questionnaire";

fn wrap(body: &str) -> String {
    format!(r#"<questionnaire xmlns="{NS}">{body}</questionnaire>"#)
}

#[test]
fn declared_not_used_and_used_not_declared_never_share_a_name() {
    let xml = wrap(
        r#"
        <variables>
          <variable name="declared_only" type="string"/>
          <variable name="age" type="string"/>
        </variables>
        <page uid="p1">
          <body>
            <questionOpen uid="o1">
              <responseDomain uid="rd1" variable="used_only"/>
            </questionOpen>
            <questionOpen uid="o2">
              <responseDomain uid="rd2" variable="age"/>
            </questionOpen>
          </body>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();

    let not_used = analyzer::vars_declared_not_used(&questionnaire);
    let not_declared = analyzer::vars_used_not_declared(&questionnaire);

    assert_eq!(not_used, vec!["declared_only".to_string()]);
    assert_eq!(not_declared, vec!["used_only".to_string()]);
    for name in &not_used {
        assert!(!not_declared.contains(name));
    }
}

/// Seed scenario: a variable declared as `boolean` is used under an open
/// question, which infers `string` — the mismatch must surface, and the
/// variable must not also appear in the used/declared disjointness lists.
#[test]
fn a_type_mismatch_is_reported_and_excluded_from_the_disjoint_lists() {
    let xml = wrap(
        r#"
        <variables>
          <variable name="consent" type="boolean"/>
        </variables>
        <page uid="p1">
          <body>
            <questionOpen uid="o1">
              <responseDomain uid="rd1" variable="consent"/>
            </questionOpen>
          </body>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();

    let inconsistent = analyzer::vars_declared_used_inconsistent(&questionnaire);
    assert_eq!(inconsistent.len(), 1);
    assert_eq!(inconsistent[0].name, "consent");
    assert_eq!(inconsistent[0].declared_type, VariableType::Boolean);
    assert_eq!(inconsistent[0].inferred_type, VariableType::String);

    assert!(analyzer::vars_declared_not_used(&questionnaire).is_empty());
    assert!(analyzer::vars_used_not_declared(&questionnaire).is_empty());
}

#[test]
fn a_variable_used_consistently_across_two_pages_is_not_flagged() {
    let xml = wrap(
        r#"
        <variables>
          <variable name="age" type="string"/>
        </variables>
        <page uid="p1">
          <body>
            <questionOpen uid="o1">
              <responseDomain uid="rd1" variable="age"/>
            </questionOpen>
          </body>
        </page>
        <page uid="p2">
          <body>
            <questionOpen uid="o2">
              <responseDomain uid="rd2" variable="age"/>
            </questionOpen>
          </body>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    assert!(analyzer::vars_declared_used_inconsistent(&questionnaire).is_empty());
    assert!(analyzer::vars_declared_not_used(&questionnaire).is_empty());
}

/// Seed scenario: an undeclared variable is inferred as `string` on one
/// page and as `singleChoiceAnswerOption` on a later page. The first
/// page's type wins in `all_page_body_vars`, and the later divergence is
/// recorded as a warning rather than silently discarded (spec Invariant:
/// "Any later discovery of a different type for the same name is a typed
/// warning, never a silent overwrite").
#[test]
fn an_inferred_type_that_varies_across_pages_is_reported_as_a_warning() {
    let xml = wrap(
        r#"
        <page uid="p1">
          <body>
            <questionOpen uid="o1">
              <responseDomain uid="rd1" variable="shared"/>
            </questionOpen>
          </body>
        </page>
        <page uid="p2">
          <body>
            <questionSingleChoice uid="q1">
              <responseDomain uid="rd2" variable="shared" type="plain">
                <answerOption uid="ao1" value="1" label="One"/>
              </responseDomain>
            </questionSingleChoice>
          </body>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();

    let used = analyzer::all_page_body_vars(&questionnaire);
    assert_eq!(used.get("shared"), Some(&VariableType::String));

    let found = questionnaire.warnings.iter().any(|w| {
        matches!(
            w,
            Warning::InferredTypeVariesAcrossPages { name, first_type, other_type }
                if name == "shared" && first_type == "string" && other_type == "singleChoiceAnswerOption"
        )
    });
    assert!(found, "expected a cross-page type-variance warning, got {:?}", questionnaire.warnings);
}

#[test]
fn an_unresolved_transition_target_is_reported_as_a_warning() {
    let xml = wrap(
        r#"
        <page uid="p1">
          <transitions><transition target="missing"/></transitions>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let found = questionnaire.warnings.iter().any(|w| {
        matches!(
            w,
            Warning::UnresolvedTarget { from_page, target }
                if from_page == "p1" && target == "missing"
        )
    });
    assert!(found, "expected an unresolved-target warning, got {:?}", questionnaire.warnings);
}
