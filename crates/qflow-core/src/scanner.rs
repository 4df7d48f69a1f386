//! Expression scanner (spec §4.A).
//!
//! Expressions embedded in `condition`, `visible` and `command` attributes,
//! and in `scriptItem` values, are opaque strings in an external
//! domain-specific language. This module never parses that language; it
//! only recognizes a fixed, narrow family of textual forms via `regex`.
//! Every pattern is defined exactly once here and shared by the analyzer,
//! the redirect resolver (§4.G) and the rewriter, so there is a single
//! source of truth for "what counts as a recognized form".
//!
//! Unknown forms are ignored — this scanner never fails.

use regex::Regex;
use std::sync::OnceLock;

fn value_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\{([A-Za-z_][A-Za-z0-9_]*)\.value\}").unwrap())
}

fn value_of_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\{zofar\.valueOf\(([A-Za-z_][A-Za-z0-9_]*)\)\}").unwrap())
}

fn as_number_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\{zofar\.asNumber\(([A-Za-z_][A-Za-z0-9_]*)\)\}").unwrap())
}

fn bare_as_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"zofar\.asNumber\(([A-Za-z_][A-Za-z0-9_]*)\)").unwrap())
}

fn bare_is_missing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"zofar\.isMissing\(([A-Za-z_][A-Za-z0-9_]*)\)").unwrap())
}

fn bare_value_dot_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(!?)([A-Za-z_][A-Za-z0-9_]*)\.value").unwrap())
}

fn to_load_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"toLoad\.add\('([^']*)'\)").unwrap())
}

fn to_reset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"toReset\.add\('([^']*)'\)").unwrap())
}

fn to_persist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"toPersist\.put\('([^']*)'").unwrap())
}

fn set_variable_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"zofar\.setVariableValue\('([^']*)'").unwrap())
}

fn redirect_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"navigatorBean\.redirect\('([^']*)'\)").unwrap())
}

fn redirect_aux_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"navigatorBean\.redirect\(([A-Za-z_][A-Za-z0-9_]*)\)").unwrap())
}

/// Every `#{VARNAME.value}`, `#{zofar.valueOf(VARNAME)}` and
/// `#{zofar.asNumber(VARNAME)}` reference found in `text`, in source order,
/// deduplicated by first occurrence.
pub fn scan_variable_refs(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for re in [value_ref_re(), value_of_re(), as_number_ref_re()] {
        for caps in re.captures_iter(text) {
            let name = caps[1].to_string();
            if !found.contains(&name) {
                found.push(name);
                tracing::trace!(variable = %caps[1], "scanner matched variable reference");
            }
        }
    }
    found
}

/// Names named by `toLoad.add('NAME')` script items.
pub fn scan_to_load(text: &str) -> Vec<String> {
    to_load_re()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Names named by `toReset.add('NAME')` script items.
pub fn scan_to_reset(text: &str) -> Vec<String> {
    to_reset_re()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Names named by `toPersist.put('NAME', …)` script items.
pub fn scan_to_persist(text: &str) -> Vec<String> {
    to_persist_re()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Names named by `zofar.setVariableValue('NAME', …)` inside action script
/// items — the implicit trigger-variable setter of §4.A.
pub fn scan_set_variable_value(text: &str) -> Vec<String> {
    set_variable_value_re()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// A resolved redirect target: either a literal page uid, or the name of an
/// auxiliary variable whose assignments must be looked up on the page's
/// variable triggers (§4.G).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectCall {
    Literal(String),
    Auxiliary(String),
}

/// Recognize `navigatorBean.redirect(...)` in `command`, preferring the
/// literal form.
pub fn scan_redirect(command: &str) -> Option<RedirectCall> {
    if let Some(caps) = redirect_literal_re().captures(command) {
        return Some(RedirectCall::Literal(caps[1].to_string()));
    }
    if let Some(caps) = redirect_aux_re().captures(command) {
        return Some(RedirectCall::Auxiliary(caps[1].to_string()));
    }
    None
}

/// Numeric/missing helper calls surfaced in the "used helpers" report:
/// `zofar.asNumber(X)`, `zofar.isMissing(X)`, `X.value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperUse {
    pub helper: &'static str,
    pub variable: String,
}

pub fn scan_helpers(text: &str) -> Vec<HelperUse> {
    let mut uses = Vec::new();
    for caps in bare_as_number_re().captures_iter(text) {
        uses.push(HelperUse {
            helper: "asNumber",
            variable: caps[1].to_string(),
        });
    }
    for caps in bare_is_missing_re().captures_iter(text) {
        uses.push(HelperUse {
            helper: "isMissing",
            variable: caps[1].to_string(),
        });
    }
    for caps in bare_value_dot_re().captures_iter(text) {
        uses.push(HelperUse {
            helper: "value",
            variable: caps[2].to_string(),
        });
    }
    uses
}

/// Rewrite comparison sugar into compact infix notation for graph labels
/// only. Idempotent and purely presentational — never used by the analyzer.
pub fn rewrite_for_display(expr: &str) -> String {
    let mut out = expr.to_string();

    out = bare_as_number_re()
        .replace_all(&out, "$1")
        .into_owned();
    out = bare_is_missing_re()
        .replace_all(&out, "isMissing($1)")
        .into_owned();
    out = bare_value_dot_re()
        .replace_all(&out, |caps: &regex::Captures| {
            if &caps[1] == "!" {
                format!("{} == F", &caps[2])
            } else {
                caps[2].to_string()
            }
        })
        .into_owned();

    out = replace_word_boundary(&out, "ge", ">=");
    out = replace_word_boundary(&out, "gt", ">");
    out = replace_word_boundary(&out, "le", "<=");
    out = replace_word_boundary(&out, "lt", "<");

    out
}

fn replace_word_boundary(text: &str, word: &str, replacement: &str) -> String {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    Regex::new(&pattern)
        .unwrap()
        .replace_all(text, replacement)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_value_dot_forms() {
        assert_eq!(scan_variable_refs("#{v.value} == 1"), vec!["v".to_string()]);
        assert_eq!(
            scan_variable_refs("#{zofar.valueOf(x)}"),
            vec!["x".to_string()]
        );
        assert_eq!(
            scan_variable_refs("#{zofar.asNumber(y)} > 3"),
            vec!["y".to_string()]
        );
    }

    #[test]
    fn scans_script_item_housekeeping() {
        assert_eq!(scan_to_load("toLoad.add('a')"), vec!["a".to_string()]);
        assert_eq!(scan_to_reset("toReset.add('b')"), vec!["b".to_string()]);
        assert_eq!(
            scan_to_persist("toPersist.put('c', x)"),
            vec!["c".to_string()]
        );
        assert_eq!(
            scan_set_variable_value("zofar.setVariableValue('d', 1)"),
            vec!["d".to_string()]
        );
    }

    #[test]
    fn scans_redirect_literal_and_auxiliary() {
        assert_eq!(
            scan_redirect("navigatorBean.redirect('X')"),
            Some(RedirectCall::Literal("X".to_string()))
        );
        assert_eq!(
            scan_redirect("navigatorBean.redirect(AUX)"),
            Some(RedirectCall::Auxiliary("AUX".to_string()))
        );
        assert_eq!(scan_redirect("somethingElse()"), None);
    }

    #[test]
    fn rewrite_is_idempotent_and_matches_seed_s6() {
        let input = "zofar.asNumber(x) ge 3 and !y.value";
        let once = rewrite_for_display(input);
        assert_eq!(once, "x >= 3 and y == F");
        let twice = rewrite_for_display(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn scans_helper_uses() {
        let uses = scan_helpers("zofar.asNumber(x) and zofar.isMissing(y) and z.value");
        assert_eq!(uses.len(), 3);
        assert_eq!(uses[0].helper, "asNumber");
        assert_eq!(uses[1].helper, "isMissing");
        assert_eq!(uses[2].helper, "value");
    }
}
