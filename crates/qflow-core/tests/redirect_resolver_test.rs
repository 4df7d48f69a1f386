//! Property 8: redirect resolution end to end, from parsed XML through
//! `Page::trig_redirect_on_exit_true/false`.

const NS: &str = "urn:qflow:questionnaire";

fn wrap(body: &str) -> String {
    format!(r#"<questionnaire xmlns="{NS}">{body}</questionnaire>"#)
}

#[test]
fn literal_redirect_resolves_to_a_single_target() {
    let xml = wrap(
        r#"
        <page uid="P1">
          <triggers>
            <action condition="true" onExit="true"
                    command="navigatorBean.redirect('P2')"/>
          </triggers>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let page = questionnaire.page("P1").unwrap();
    assert_eq!(page.trig_redirect_on_exit_true.len(), 1);
    assert_eq!(
        page.trig_redirect_on_exit_true[0].target_cond_list,
        vec![("P2".to_string(), "true".to_string())]
    );
    assert!(page.trig_redirect_on_exit_false.is_empty());
}

/// Seed scenario: an auxiliary variable assigned two different targets
/// under two different conditions, read back as two `(target, condition)`
/// pairs on the same redirect.
#[test]
fn auxiliary_redirect_resolves_every_assignment_on_the_page() {
    let xml = wrap(
        r#"
        <page uid="P1">
          <triggers>
            <action condition="true" onExit="true"
                    command="navigatorBean.redirect(nextPageAux)"/>
            <variable variable="nextPageAux" value="page_a"
                      condition="#{x.value} == 1" onExit="true"/>
            <variable variable="nextPageAux" value="page_b"
                      condition="#{x.value} == 2" onExit="true"/>
          </triggers>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let page = questionnaire.page("P1").unwrap();
    assert_eq!(page.trig_redirect_on_exit_true.len(), 1);
    assert_eq!(
        page.trig_redirect_on_exit_true[0].target_cond_list,
        vec![
            ("page_a".to_string(), "#{x.value} == 1".to_string()),
            ("page_b".to_string(), "#{x.value} == 2".to_string()),
        ]
    );
}

#[test]
fn on_enter_and_on_exit_redirects_are_kept_separate() {
    let xml = wrap(
        r#"
        <page uid="P1">
          <triggers>
            <action condition="true" onExit="false"
                    command="navigatorBean.redirect('entry_target')"/>
            <action condition="true" onExit="true"
                    command="navigatorBean.redirect('exit_target')"/>
          </triggers>
        </page>
        "#,
    );
    let questionnaire = qflow_core::read_questionnaire(&xml).unwrap();
    let page = questionnaire.page("P1").unwrap();
    assert_eq!(
        page.trig_redirect_on_exit_false[0].target_cond_list,
        vec![("entry_target".to_string(), "true".to_string())]
    );
    assert_eq!(
        page.trig_redirect_on_exit_true[0].target_cond_list,
        vec![("exit_target".to_string(), "true".to_string())]
    );
}
