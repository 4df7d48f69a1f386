//! Property 1: byte-identical input produces equal Questionnaires and
//! equal analyzer reports.

use qflow_core::analyzer;

const XML: &str = r#"
<questionnaire xmlns="urn:qflow:questionnaire">
  <name>Wellbeing Survey</name>
  <preloads><preloadItem variable="cohort"/></preloads>
  <variables>
    <variable name="age" type="number"/>
    <variable name="consent" type="boolean"/>
  </variables>
  <page uid="intro">
    <transitions><transition target="q1"/></transitions>
  </page>
  <page uid="q1">
    <body>
      <questionOpen uid="o1">
        <question uid="h1">How old are you?</question>
        <responseDomain uid="rd1" variable="age"/>
      </questionOpen>
    </body>
    <transitions><transition target="intro" condition="false"/></transitions>
  </page>
</questionnaire>
"#;

#[test]
fn two_reads_of_the_same_document_are_equal() {
    let first = qflow_core::read_questionnaire(XML).unwrap();
    let second = qflow_core::read_questionnaire(XML).unwrap();

    assert_eq!(first.name, second.name);
    assert_eq!(first.declared_variables, second.declared_variables);
    assert_eq!(first.pages, second.pages);
    assert_eq!(first.warnings, second.warnings);

    let report_a = analyzer::analyze(&first);
    let report_b = analyzer::analyze(&second);
    assert_eq!(report_a, report_b);
}
