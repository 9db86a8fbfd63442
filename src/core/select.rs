//! core::select
//!
//! Resolving exactly one merchant from an optional query.
//!
//! # Rules
//!
//! 1. No merchants at all fails with [`SelectError::NoMerchants`]
//! 2. A query narrows with [`fuzzy_filter`]; a single hit is selected
//!    without prompting, zero hits fail with [`SelectError::NoMatches`]
//! 3. Otherwise the picker is asked to choose from the narrowed set, with
//!    every keystroke re-filtering the full set
//! 4. A picked id that is not a known merchant fails with
//!    [`SelectError::SelectionFailed`]
//!
//! The picker is a trait so that commands can be driven by a terminal
//! prompt in production and by a scripted picker in tests.

use thiserror::Error;

use super::lookup::fuzzy_filter;
use super::merchant::Merchant;
use super::types::MerchantId;
use crate::ui::prompts::PromptError;

/// Errors from selection resolution.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no merchants found. Add a merchant first with \"sp add\"")]
    NoMerchants,

    #[error("no merchants found matching \"{0}\"")]
    NoMatches(String),

    #[error("merchant selection failed")]
    SelectionFailed,

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// What a picker is asked to choose from.
#[derive(Debug)]
pub struct PickRequest<'a> {
    /// Prompt text.
    pub message: &'a str,
    /// The full merchant set, searched on every keystroke.
    pub all: &'a [Merchant],
    /// The set shown before anything is typed.
    pub initial: Vec<&'a Merchant>,
}

impl<'a> PickRequest<'a> {
    /// Merchants to offer for the current search input.
    pub fn candidates(&self, input: &str) -> Vec<&'a Merchant> {
        if input.is_empty() {
            self.initial.clone()
        } else {
            fuzzy_filter(self.all, input)
        }
    }
}

/// Something that lets an operator pick one merchant.
pub trait MerchantPicker {
    /// Return the id of the chosen merchant.
    fn pick(&mut self, request: &PickRequest<'_>) -> Result<MerchantId, PromptError>;
}

/// Resolve one merchant from `all`, optionally narrowed by `query`.
pub fn resolve<'a>(
    all: &'a [Merchant],
    query: Option<&str>,
    message: &str,
    picker: &mut dyn MerchantPicker,
) -> Result<&'a Merchant, SelectError> {
    if all.is_empty() {
        return Err(SelectError::NoMerchants);
    }

    let initial = match query.filter(|q| !q.trim().is_empty()) {
        Some(q) => {
            let narrowed = fuzzy_filter(all, q);
            match narrowed.len() {
                0 => return Err(SelectError::NoMatches(q.to_string())),
                1 => return Ok(narrowed[0]),
                _ => narrowed,
            }
        }
        None => all.iter().collect(),
    };

    let request = PickRequest {
        message,
        all,
        initial,
    };
    let id = picker.pick(&request)?;

    all.iter()
        .find(|m| m.id == id)
        .ok_or(SelectError::SelectionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Handle;

    fn merchant(name: &str, handle: &str) -> Merchant {
        let handle = Handle::normalize(handle).unwrap();
        let url = handle.myshopify_url();
        Merchant::new(name, &handle, url)
    }

    /// Picks a fixed handle from whatever it is offered and records the offer.
    struct ScriptedPicker {
        choose: Option<String>,
        offered: Vec<String>,
        calls: usize,
    }

    impl ScriptedPicker {
        fn choosing(handle: &str) -> Self {
            Self {
                choose: Some(handle.to_string()),
                offered: Vec::new(),
                calls: 0,
            }
        }
    }

    impl MerchantPicker for ScriptedPicker {
        fn pick(&mut self, request: &PickRequest<'_>) -> Result<MerchantId, PromptError> {
            self.calls += 1;
            self.offered = request.initial.iter().map(|m| m.handle.clone()).collect();
            let handle = self.choose.clone().ok_or(PromptError::Cancelled)?;
            Ok(request
                .all
                .iter()
                .find(|m| m.handle == handle)
                .map(|m| m.id.clone())
                .unwrap_or_else(|| MerchantId::new("unknown")))
        }
    }

    #[test]
    fn empty_registry_fails_before_prompting() {
        let mut picker = ScriptedPicker::choosing("acme");
        let err = resolve(&[], Some("acme"), "Select", &mut picker).unwrap_err();
        assert!(matches!(err, SelectError::NoMerchants));
        assert_eq!(picker.calls, 0);
    }

    #[test]
    fn single_match_is_auto_selected() {
        let all = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let mut picker = ScriptedPicker::choosing("beta");

        let found = resolve(&all, Some("acme"), "Select", &mut picker).unwrap();
        assert_eq!(found.handle, "acme");
        assert_eq!(picker.calls, 0);
    }

    #[test]
    fn no_matches_for_query_fails() {
        let all = vec![merchant("Acme Co", "acme")];
        let mut picker = ScriptedPicker::choosing("acme");

        let err = resolve(&all, Some("xyzzy"), "Select", &mut picker).unwrap_err();
        assert!(matches!(err, SelectError::NoMatches(q) if q == "xyzzy"));
    }

    #[test]
    fn no_query_prompts_with_everything() {
        let all = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let mut picker = ScriptedPicker::choosing("beta");

        let found = resolve(&all, None, "Select", &mut picker).unwrap();
        assert_eq!(found.handle, "beta");
        assert_eq!(picker.offered, vec!["acme", "beta"]);
    }

    #[test]
    fn blank_query_behaves_like_none() {
        let all = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let mut picker = ScriptedPicker::choosing("acme");

        resolve(&all, Some("  "), "Select", &mut picker).unwrap();
        assert_eq!(picker.calls, 1);
        assert_eq!(picker.offered.len(), 2);
    }

    #[test]
    fn several_matches_prompt_with_narrowed_set() {
        let all = vec![
            merchant("Outdoor", "outdoor"),
            merchant("Beta Shop", "beta"),
            merchant("Outdoors Plus", "outdoors-plus"),
        ];
        let mut picker = ScriptedPicker::choosing("outdoors-plus");

        let found = resolve(&all, Some("outdoor"), "Select", &mut picker).unwrap();
        assert_eq!(found.handle, "outdoors-plus");
        assert_eq!(picker.offered, vec!["outdoor", "outdoors-plus"]);
    }

    #[test]
    fn unknown_pick_is_selection_failure() {
        let all = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let mut picker = ScriptedPicker::choosing("missing");

        let err = resolve(&all, None, "Select", &mut picker).unwrap_err();
        assert!(matches!(err, SelectError::SelectionFailed));
    }

    #[test]
    fn cancelled_prompt_propagates() {
        let all = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let mut picker = ScriptedPicker {
            choose: None,
            offered: Vec::new(),
            calls: 0,
        };

        let err = resolve(&all, None, "Select", &mut picker).unwrap_err();
        assert!(matches!(err, SelectError::Prompt(PromptError::Cancelled)));
    }

    #[test]
    fn candidates_refilter_full_set() {
        let all = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let request = PickRequest {
            message: "Select",
            all: &all,
            initial: vec![&all[0]],
        };

        assert_eq!(request.candidates("").len(), 1);
        let typed = request.candidates("beta");
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].handle, "beta");
    }
}
