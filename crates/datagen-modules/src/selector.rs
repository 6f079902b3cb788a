//! Output selectors: the subset of a module's tables to generate.

use crate::error::{ModuleError, ModuleResult};

/// Set of requested selector tags, validated against a module's allowed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    selected: Vec<String>,
}

impl Selector {
    /// Creates a selector. Every requested tag must be allowed, and the
    /// allowed list must not be empty.
    pub fn new<S: AsRef<str>>(allowed: &[&str], requested: &[S]) -> ModuleResult<Self> {
        if allowed.is_empty() {
            return Err(ModuleError::NoSelectorAllowed);
        }
        for tag in requested {
            let tag = tag.as_ref();
            if !allowed.contains(&tag) {
                return Err(ModuleError::SelectorNotAllowed(tag.to_string()));
            }
        }
        Ok(Self {
            selected: requested.iter().map(|tag| tag.as_ref().to_string()).collect(),
        })
    }

    /// Returns true when every tag is selected. An empty tag list is never
    /// selected.
    pub fn is_selected(&self, tags: &[&str]) -> bool {
        !tags.is_empty() && tags.iter().all(|tag| self.selected.iter().any(|s| s == tag))
    }

    /// Returns true when at least one of the tags is selected.
    pub fn any_selected(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.is_selected(&[*tag]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn test_new_requires_allowed() {
        assert!(matches!(
            Selector::new(&[], NONE),
            Err(ModuleError::NoSelectorAllowed)
        ));
    }

    #[test]
    fn test_new_rejects_disallowed() {
        let err = Selector::new(&["a", "b"], &["a", "c"]).unwrap_err();
        assert_eq!(err.to_string(), "selector: \"c\" selected but not allowed");
    }

    #[test]
    fn test_new_keeps_requested_order() {
        let s = Selector::new(&["a", "b", "c"], &["c", "a"]).unwrap();
        assert_eq!(s.selected, vec!["c".to_string(), "a".to_string()]);
        assert!(Selector::new(&["a"], NONE).unwrap().selected.is_empty());
        assert_eq!(Selector::new(&[""], &[""]).unwrap().selected.len(), 1);
    }

    #[test]
    fn test_is_selected() {
        let s = Selector::new(&["a", "b", "c"], &["a", "c"]).unwrap();
        assert!(!s.is_selected(&[]));
        assert!(s.is_selected(&["a"]));
        assert!(!s.is_selected(&["b"]));
        assert!(s.is_selected(&["a", "c"]));
        assert!(!s.is_selected(&["a", "b"]));
        assert!(s.is_selected(&["a", "a"]));
        assert!(!s.is_selected(&["z"]));
    }

    #[test]
    fn test_nothing_selected() {
        let s = Selector::new(&["a", "b"], NONE).unwrap();
        assert!(!s.is_selected(&["a"]));
        assert!(!s.any_selected(&["a", "b"]));
    }

    #[test]
    fn test_any_selected() {
        let s = Selector::new(&["a", "b", "c"], &["b"]).unwrap();
        assert!(s.any_selected(&["a", "b"]));
        assert!(!s.any_selected(&["a", "c"]));
        assert!(!s.any_selected(&[]));
    }
}
