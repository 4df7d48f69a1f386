//! The top-level loaded document: declared variables, ordered pages, the
//! analyzer's masked page view, and accumulated warnings.

use indexmap::IndexMap;

use crate::error::Warning;

use super::page::Page;
use super::variable::Variable;

/// A fully loaded questionnaire.
///
/// Immutable after load except for [`Questionnaire::warnings`] and the
/// masked page view mutated by [`Questionnaire::filter`],
/// [`Questionnaire::collapse_pages`] and [`Questionnaire::remove_transitions`].
/// Those three never touch `pages`, the unmasked original order the reader
/// produced.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    pub name: Option<String>,
    pub declared_variables: IndexMap<String, Variable>,
    pub pages: Vec<Page>,
    active_pages: Vec<Page>,
    pub warnings: Vec<Warning>,
}

impl Questionnaire {
    pub fn new(
        name: Option<String>,
        declared_variables: IndexMap<String, Variable>,
        pages: Vec<Page>,
    ) -> Self {
        let active_pages = pages.clone();
        Self {
            name,
            declared_variables,
            pages,
            active_pages,
            warnings: Vec::new(),
        }
    }

    /// The current masked/active page view, in document order unless a
    /// prior `filter`/`collapse_pages` call reordered it.
    pub fn active_pages(&self) -> &[Page] {
        &self.active_pages
    }

    /// Discard any masking and restore the active view to the unmasked
    /// document order.
    pub fn reset_mask(&mut self) {
        self.active_pages = self.pages.clone();
    }

    /// Keep only active pages matching `predicate`.
    pub fn filter<F: Fn(&Page) -> bool>(&mut self, predicate: F) {
        self.active_pages.retain(|p| predicate(p));
    }

    /// Drop active pages matching `predicate` — e.g. collapsing
    /// episode-loop subpages out of a higher-level flow view.
    pub fn collapse_pages<F: Fn(&Page) -> bool>(&mut self, predicate: F) {
        self.active_pages.retain(|p| !predicate(p));
    }

    /// Remove transitions matching `predicate` from every active page,
    /// without touching `pages`.
    pub fn remove_transitions<F: Fn(&super::trigger::Transition) -> bool>(&mut self, predicate: F) {
        for page in &mut self.active_pages {
            page.transitions.retain(|t| !predicate(t));
        }
    }

    pub fn page(&self, uid: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.uid == uid)
    }

    pub fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
