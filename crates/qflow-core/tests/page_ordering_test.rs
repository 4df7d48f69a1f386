//! Property 2: `pages` preserves document order, including header, option,
//! item, transition and trigger order within each page.

const XML: &str = r#"
<questionnaire xmlns="urn:qflow:questionnaire">
  <page uid="first">
    <transitions>
      <transition target="second" condition="a"/>
      <transition target="third" condition="b"/>
    </transitions>
  </page>
  <page uid="second"/>
  <page uid="third">
    <body>
      <questionSingleChoice uid="q1">
        <responseDomain uid="rd1" variable="v">
          <answerOption uid="z" value="9" label="Z"/>
          <answerOption uid="a" value="1" label="A"/>
        </responseDomain>
      </questionSingleChoice>
    </body>
  </page>
</questionnaire>
"#;

#[test]
fn pages_are_in_document_order() {
    let questionnaire = qflow_core::read_questionnaire(XML).unwrap();
    let uids: Vec<&str> = questionnaire.pages.iter().map(|p| p.uid.as_str()).collect();
    assert_eq!(uids, vec!["first", "second", "third"]);
}

#[test]
fn transitions_within_a_page_stay_in_source_order() {
    let questionnaire = qflow_core::read_questionnaire(XML).unwrap();
    let page = questionnaire.page("first").unwrap();
    let targets: Vec<&str> = page.transitions.iter().map(|t| t.target_uid.as_str()).collect();
    assert_eq!(targets, vec!["second", "third"]);
}

#[test]
fn answer_options_keep_their_source_order_even_when_not_alphabetical() {
    let questionnaire = qflow_core::read_questionnaire(XML).unwrap();
    let page = questionnaire.page("third").unwrap();
    let qflow_core::model::Question::SingleChoice { domain, .. } = &page.questions[0] else {
        panic!("expected a single-choice question");
    };
    let qflow_core::model::ResponseDomain::SingleChoice { options, .. } = domain else {
        panic!("expected a single-choice domain");
    };
    let uids: Vec<&str> = options.iter().map(|o| o.uid()).collect();
    assert_eq!(uids, vec!["z", "a"]);
}
