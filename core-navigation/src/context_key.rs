//! Context key derivation.
//!
//! A context key names one registry slot. Tab keys are deterministic and
//! singleton (`tab:<name>`). Every other style first looks for an existing
//! key with the `<style>:<name>:` prefix and reuses it, only minting a new
//! suffix-randomized key when none exists. This bounds container growth when
//! the same logical screen is navigated to repeatedly, at the cost of
//! collapsing simultaneous same-name/same-style instances onto one slot.

use bridge_traits::presentation::PresentationStyle;
use uuid::Uuid;

/// Derive the context key for `(name, style)` given the keys currently in
/// the registry.
pub fn derive<'a, I>(existing: I, name: &str, style: PresentationStyle) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    if style == PresentationStyle::Tab {
        return tab_key(name);
    }

    let prefix = reuse_prefix(name, style);
    if let Some(found) = existing.into_iter().find(|key| key.starts_with(&prefix)) {
        return found.to_string();
    }

    format!("{prefix}{}", random_suffix())
}

/// Deterministic singleton key for a tab screen.
pub fn tab_key(name: &str) -> String {
    format!("tab:{name}")
}

/// Prefix shared by all instances of `(name, style)` for non-tab styles.
pub fn reuse_prefix(name: &str, style: PresentationStyle) -> String {
    format!("{}:{name}:", style.as_str())
}

/// Whether a key names a tab slot (exempt from sweeping).
pub fn is_tab_key(key: &str) -> bool {
    key.starts_with("tab:")
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_keys_are_deterministic() {
        let a = derive([], "home", PresentationStyle::Tab);
        let b = derive([], "home", PresentationStyle::Tab);
        assert_eq!(a, b);
        assert_eq!(a, "tab:home");
    }

    #[test]
    fn test_non_tab_key_minted_with_suffix() {
        let key = derive([], "details", PresentationStyle::Push);
        assert!(key.starts_with("push:details:"));
        assert_eq!(key.len(), "push:details:".len() + 8);
    }

    #[test]
    fn test_existing_prefix_match_is_reused() {
        let existing = "modal:confirm:deadbeef";
        let key = derive([existing], "confirm", PresentationStyle::Modal);
        assert_eq!(key, existing);
    }

    #[test]
    fn test_prefix_match_requires_full_name() {
        // "confirm-all" must not match the "confirm" prefix slot.
        let existing = "modal:confirm-all:deadbeef";
        let key = derive([existing], "confirm", PresentationStyle::Modal);
        assert_ne!(key, existing);
        assert!(key.starts_with("modal:confirm:"));
    }

    #[test]
    fn test_styles_do_not_share_slots() {
        let existing = "modal:confirm:deadbeef";
        let key = derive([existing], "confirm", PresentationStyle::Sheet);
        assert!(key.starts_with("sheet:confirm:"));
    }

    #[test]
    fn test_is_tab_key() {
        assert!(is_tab_key("tab:home"));
        assert!(!is_tab_key("push:home:12345678"));
    }
}
