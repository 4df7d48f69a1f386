//! Literal input/output checks for the seed scenarios S1-S6.

use qflow_core::analyzer;
use qflow_core::graph::{FlowGraph, RenderOptions};
use qflow_core::scanner;

const NS: &str = "urn:qflow:questionnaire";

fn wrap(body: &str) -> String {
    format!(r#"<questionnaire xmlns="{NS}">{body}</questionnaire>"#)
}

/// S1: one page with a single-choice question and an unresolved transition
/// target; expect a one-element topological order and matching dead-end
/// classification.
#[test]
fn s1_single_page_unresolved_transition() {
    let xml = wrap(
        r#"
        <variables><variable name="v" type="singleChoiceAnswerOption"/></variables>
        <page uid="P1">
          <transitions><transition target="P2"/></transitions>
          <body>
            <questionSingleChoice uid="q1">
              <question uid="h1">Pick one</question>
              <responseDomain uid="rd1" variable="v" type="plain">
                <answerOption uid="ao1" value="1" label="One"/>
                <answerOption uid="ao2" value="2" label="Two"/>
              </responseDomain>
            </questionSingleChoice>
          </body>
        </page>
        "#,
    );

    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let dead_ends = analyzer::dead_end_pages(&questionnaire);
    assert_eq!(dead_ends.targets_not_found, vec!["P2".to_string()]);
    assert_eq!(dead_ends.lost_pages, vec!["P1".to_string()]);

    let graph = FlowGraph::build(&questionnaire);
    assert_eq!(graph.topological_order().unwrap(), vec!["P1".to_string()]);
}

/// S2: duplicate transitions to the same target, one with a literal-false
/// condition; the removal-aware rendering combines them into one labeled
/// edge and the analyzer does not flag the target as only-false.
#[test]
fn s2_mixed_condition_transitions() {
    let xml = wrap(
        r#"
        <page uid="A">
          <transitions>
            <transition target="B" condition="b.value"/>
            <transition target="B" condition="false"/>
          </transitions>
        </page>
        <page uid="B"/>
        "#,
    );

    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let dead_ends = analyzer::dead_end_pages(&questionnaire);
    assert!(dead_ends.only_false_conditions.is_empty());

    let graph = FlowGraph::build(&questionnaire);
    let options = RenderOptions {
        show_cond: true,
        remove_cond_false: true,
        ..Default::default()
    };
    let dot = graph.to_dot(&questionnaire, options, None);
    assert!(dot.contains("[0] b.value | [1] false"));
}

/// S3: a literal redirect and an auxiliary-variable redirect on the same
/// exit side resolve to three (target, condition) pairs in source order.
#[test]
fn s3_redirect_resolution_literal_then_auxiliary() {
    let xml = wrap(
        r#"
        <page uid="P1">
          <triggers>
            <action command="navigatorBean.redirect('X')" condition="c1" onExit="true"/>
            <action command="navigatorBean.redirect(AUX)" condition="c2" onExit="true"/>
            <variable variable="AUX" value="Y" condition="c3" onExit="true"/>
            <variable variable="AUX" value="Z" condition="c4" onExit="true"/>
          </triggers>
        </page>
        "#,
    );

    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let page = questionnaire.page("P1").unwrap();

    let flattened: Vec<(String, String)> = page
        .trig_redirect_on_exit_true
        .iter()
        .flat_map(|r| r.target_cond_list.clone())
        .collect();

    assert_eq!(
        flattened,
        vec![
            ("X".to_string(), "c1".to_string()),
            ("Y".to_string(), "c3".to_string()),
            ("Z".to_string(), "c4".to_string()),
        ]
    );
}

/// S4: a matrix item whose answer-option set diverges from its siblings
/// fails the shared-options assertion.
#[test]
fn s4_matrix_with_divergent_item_options_panics() {
    use qflow_core::model::{AnswerOption, AttachedOpen, Item, ResponseDomain};

    fn sc_option(uid: &str, value: &str) -> AnswerOption {
        AnswerOption::SingleChoice {
            uid: uid.to_string(),
            value: value.to_string(),
            label: value.to_string(),
            visible: None,
            missing: false,
            attached_opens: Vec::new(),
        }
    }

    fn item(uid: &str, option_uids: &[&str]) -> Item {
        Item {
            uid: uid.to_string(),
            headers: Vec::new(),
            domain: Box::new(ResponseDomain::SingleChoice {
                uid: format!("{uid}_rd"),
                var_ref: qflow_core::model::VarRef::new(format!("{uid}_var")),
                subtype: qflow_core::model::SingleChoiceSubtype::Plain,
                options: option_uids.iter().map(|u| sc_option(u, u)).collect(),
            }),
            attached_opens: Vec::<AttachedOpen>::new(),
        }
    }

    let items = vec![
        item("i1", &["ao1", "ao2", "ao3"]),
        item("i2", &["ao1", "ao2", "ao3"]),
        item("i3", &["ao1", "ao2"]),
    ];

    let result = std::panic::catch_unwind(|| {
        qflow_core::generator::assert_items_share_options(&items);
    });
    assert!(result.is_err());
}

/// S5: a declared `boolean` variable used only inside a matrix single-choice
/// shows up only in the inconsistent-type list.
#[test]
fn s5_declared_type_differs_from_body_usage() {
    let xml = wrap(
        r#"
        <variables><variable name="foo" type="boolean"/></variables>
        <page uid="P1">
          <body>
            <matrixQuestionSingleChoice uid="m1">
              <item uid="i1">
                <responseDomain uid="rd1" variable="foo" type="plain">
                  <answerOption uid="ao1" value="1" label="One"/>
                </responseDomain>
              </item>
            </matrixQuestionSingleChoice>
          </body>
        </page>
        "#,
    );

    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let inconsistent = analyzer::vars_declared_used_inconsistent(&questionnaire);
    assert_eq!(inconsistent.len(), 1);
    assert_eq!(inconsistent[0].name, "foo");

    assert!(analyzer::vars_declared_not_used(&questionnaire).is_empty());
    assert!(analyzer::vars_used_not_declared(&questionnaire).is_empty());
}

/// S6: the display rewriter turns comparison sugar into compact infix form.
#[test]
fn s6_rewrite_comparison_sugar() {
    let rewritten = scanner::rewrite_for_display("zofar.asNumber(x) ge 3 and !y.value");
    assert_eq!(rewritten, "x >= 3 and y == F");
}
