//! Properties 5 and 6: self-loop independence and topological-sort
//! validity.

use qflow_core::graph::FlowGraph;

const NS: &str = "urn:qflow:questionnaire";

fn wrap(body: &str) -> String {
    format!(r#"<questionnaire xmlns="{NS}">{body}</questionnaire>"#)
}

#[test]
fn self_loop_does_not_create_a_reported_cycle() {
    let xml = wrap(
        r#"
        <page uid="A">
          <transitions>
            <transition target="A"/>
            <transition target="B"/>
          </transitions>
        </page>
        <page uid="B"/>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let graph = FlowGraph::build(&questionnaire);
    let order = graph.topological_order().expect("self-loop alone must not create a cycle");
    assert_eq!(order, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn acyclic_graph_orders_every_transition_forward() {
    let xml = wrap(
        r#"
        <page uid="C">
          <transitions><transition target="A"/></transitions>
        </page>
        <page uid="A">
          <transitions><transition target="B"/></transitions>
        </page>
        <page uid="B"/>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let graph = FlowGraph::build(&questionnaire);
    let order = graph.topological_order().unwrap();
    let index_of = |uid: &str| order.iter().position(|x| x == uid).unwrap();

    for page in &questionnaire.pages {
        for transition in &page.transitions {
            assert!(
                index_of(&page.uid) < index_of(&transition.target_uid),
                "transition {} -> {} violates topological order {:?}",
                page.uid,
                transition.target_uid,
                order
            );
        }
    }
}

#[test]
fn a_genuine_cycle_is_reported_as_an_error() {
    let xml = wrap(
        r#"
        <page uid="A"><transitions><transition target="B"/></transitions></page>
        <page uid="B"><transitions><transition target="A"/></transitions></page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let graph = FlowGraph::build(&questionnaire);
    let cycle = graph.topological_order().unwrap_err();
    assert!(cycle.contains(&"A".to_string()) && cycle.contains(&"B".to_string()));
}
