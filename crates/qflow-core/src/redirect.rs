//! Resolves `navigatorBean.redirect(...)` calls on action triggers into
//! concrete `(target, condition)` pairs (spec §4.G).
//!
//! A redirect call is either a string literal — already a page uid — or a
//! reference to an auxiliary variable whose possible values are set by
//! `variable` triggers elsewhere on the same page. Resolving the auxiliary
//! form means finding every `variable` trigger that assigns the same
//! auxiliary name and pairing its `value` with its own `condition`.

use crate::model::{Trigger, TriggerRedirect};
use crate::scanner::{self, RedirectCall};

/// Resolve every action trigger matching `on_exit` into the [`TriggerRedirect`]
/// list it contributes, in trigger order.
pub fn resolve_redirects(triggers: &[Trigger], on_exit: bool) -> Vec<TriggerRedirect> {
    let mut out = Vec::new();

    for trigger in triggers {
        let Trigger::Action {
            command,
            script_items,
            condition,
            on_exit: trigger_on_exit,
            ..
        } = trigger
        else {
            continue;
        };
        if *trigger_on_exit != on_exit {
            continue;
        }

        let call = scanner::scan_redirect(command).or_else(|| {
            script_items
                .iter()
                .find_map(|s| scanner::scan_redirect(&s.value))
        });

        match call {
            Some(RedirectCall::Literal(target)) => {
                out.push(TriggerRedirect::single(target, condition.clone()));
            }
            Some(RedirectCall::Auxiliary(aux_name)) => {
                let resolved = resolve_auxiliary(triggers, &aux_name, on_exit);
                if resolved.target_cond_list.is_empty() {
                    tracing::warn!(
                        auxiliary = %aux_name,
                        "redirect auxiliary variable has no matching assignment on this page"
                    );
                }
                out.push(resolved);
            }
            None => {}
        }
    }

    out
}

/// Every `variable` trigger on the page that assigns `aux_name`, matching
/// `on_exit`, paired as `(value, condition)`.
fn resolve_auxiliary(triggers: &[Trigger], aux_name: &str, on_exit: bool) -> TriggerRedirect {
    let mut pairs = Vec::new();
    for trigger in triggers {
        if let Trigger::Variable {
            variable,
            value,
            condition,
            on_exit: trigger_on_exit,
            ..
        } = trigger
        {
            if variable == aux_name && *trigger_on_exit == on_exit {
                pairs.push((value.clone(), condition.clone()));
            }
        }
    }
    TriggerRedirect {
        target_cond_list: pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TriggerDirection;

    fn action(command: &str, condition: &str, on_exit: bool) -> Trigger {
        Trigger::Action {
            command: command.to_string(),
            script_items: Vec::new(),
            condition: condition.to_string(),
            on_exit,
            direction: TriggerDirection::Forward,
        }
    }

    fn variable(name: &str, value: &str, condition: &str, on_exit: bool) -> Trigger {
        Trigger::Variable {
            variable: name.to_string(),
            value: value.to_string(),
            condition: condition.to_string(),
            on_exit,
            direction: TriggerDirection::Forward,
        }
    }

    #[test]
    fn resolves_literal_redirect() {
        let triggers = vec![action(
            "navigatorBean.redirect('page2')",
            "true",
            true,
        )];
        let resolved = resolve_redirects(&triggers, true);
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].target_cond_list,
            vec![("page2".to_string(), "true".to_string())]
        );
    }

    /// Seed scenario: an action redirects via an auxiliary variable that is
    /// set to two different targets under two different conditions.
    #[test]
    fn resolves_auxiliary_redirect_to_multiple_targets() {
        let triggers = vec![
            action("navigatorBean.redirect(nextPageAux)", "true", true),
            variable("nextPageAux", "page_a", "#{x.value} == 1", true),
            variable("nextPageAux", "page_b", "#{x.value} == 2", true),
        ];
        let resolved = resolve_redirects(&triggers, true);
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].target_cond_list,
            vec![
                ("page_a".to_string(), "#{x.value} == 1".to_string()),
                ("page_b".to_string(), "#{x.value} == 2".to_string()),
            ]
        );
    }

    #[test]
    fn ignores_triggers_on_the_other_exit_side() {
        let triggers = vec![action("navigatorBean.redirect('page2')", "true", false)];
        assert!(resolve_redirects(&triggers, true).is_empty());
    }

    #[test]
    fn non_redirect_actions_produce_nothing() {
        let triggers = vec![action("zofar.setVariableValue('x', 1)", "true", true)];
        assert!(resolve_redirects(&triggers, true).is_empty());
    }
}
