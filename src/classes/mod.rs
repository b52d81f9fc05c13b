//! Utility-class editing
//!
//! Removes and/or adds tokens in a space-delimited utility-class string such
//! as `"px-4 py-2 bg-slate-800 text-emerald-50"`.
//!
//! A token's *prefix* is the leading run of lowercase letters and `:` after an
//! optional `-` (`bg` for `bg-red-500`, `hover:bg` for `hover:bg-slate-700`,
//! `mt` for `-mt-2`). When an added token's prefix occurs inside an existing
//! token, the two may style the same property; that is logged as a warning and
//! the add still happens.
//!
//! # Example
//!
//! ```rust
//! use climate_dash::classes::update_utility_classes;
//!
//! let updated = update_utility_classes(
//!     "bg-slate-800 text-emerald-50",
//!     &["bg-slate-800"],
//!     &["bg-emerald-50"],
//!     false,
//! )
//! .unwrap();
//! assert_eq!(updated, "text-emerald-50 bg-emerald-50");
//! ```

mod error;

pub use error::{ClassError, ClassResult};

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?([a-z:]+)").expect("valid prefix pattern"))
}

/// Prefix of a utility class, if it has one
pub fn class_prefix(token: &str) -> Option<&str> {
    prefix_pattern()
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Existing classes sharing a prefix with a newly added class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixCollision {
    pub added: String,
    pub prefix: String,
    pub existing: Vec<String>,
}

impl fmt::Display for PrefixCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "adding '{}': class(es) with the same prefix '{}' already present: {:?}",
            self.added, self.prefix, self.existing
        )
    }
}

/// An ordered list of utility classes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    /// Split a class string on whitespace
    pub fn parse(s: &str) -> Self {
        Self {
            classes: s.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.as_str())
    }

    /// Remove the first occurrence of `class`; returns whether it was present
    pub fn remove(&mut self, class: &str) -> bool {
        match self.classes.iter().position(|c| c == class) {
            Some(pos) => {
                self.classes.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Append `class`, reporting any prefix collision
    ///
    /// Fails with `DuplicateToken` (naming `current`, the string the edit
    /// started from) if the class is already present, or `InvalidToken` if it
    /// has no prefix.
    pub fn add(&mut self, class: &str, current: &str) -> ClassResult<Option<PrefixCollision>> {
        if self.contains(class) {
            return Err(ClassError::DuplicateToken {
                token: class.to_string(),
                current: current.to_string(),
            });
        }

        let prefix =
            class_prefix(class).ok_or_else(|| ClassError::InvalidToken(class.to_string()))?;

        let existing: Vec<String> = self
            .classes
            .iter()
            .filter(|c| c.contains(prefix))
            .cloned()
            .collect();

        let collision = if existing.is_empty() {
            None
        } else {
            Some(PrefixCollision {
                added: class.to_string(),
                prefix: prefix.to_string(),
                existing,
            })
        };

        self.classes.push(class.to_string());
        Ok(collision)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.classes.join(" "))
    }
}

/// Remove and/or add classes in a utility-class string
///
/// Removals run first, each removing the first exact match. Additions are
/// appended in order. The result is the remaining original classes followed by
/// the added ones, joined by single spaces. Set `ignore_prefix_warning` to
/// silence the collision warning for adds known not to conflict.
pub fn update_utility_classes(
    current: &str,
    remove: &[&str],
    add: &[&str],
    ignore_prefix_warning: bool,
) -> ClassResult<String> {
    if remove.is_empty() && add.is_empty() {
        return Err(ClassError::InvalidArgument);
    }

    let mut classes = ClassList::parse(current);

    for class in remove {
        if !classes.remove(class) {
            return Err(ClassError::TokenNotFound {
                token: class.to_string(),
                current: current.to_string(),
            });
        }
    }

    for class in add {
        if let Some(collision) = classes.add(class, current)? {
            if !ignore_prefix_warning {
                tracing::warn!(
                    added = %collision.added,
                    prefix = %collision.prefix,
                    existing = ?collision.existing,
                    "Possible utility class conflict; pass ignore_prefix_warning if intended"
                );
            }
        }
    }

    Ok(classes.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_swap_background() {
        let updated = update_utility_classes(
            "bg-slate-800 text-emerald-50",
            &["bg-slate-800"],
            &["bg-emerald-50"],
            false,
        )
        .unwrap();
        assert_eq!(updated, "text-emerald-50 bg-emerald-50");
    }

    #[test]
    fn test_remove_then_readd_keeps_set() {
        let original = "px-4 py-2 flex text-emerald-50";
        let removed = update_utility_classes(original, &["py-2"], &[], false).unwrap();
        assert_eq!(removed, "px-4 flex text-emerald-50");

        let readded = update_utility_classes(&removed, &[], &["py-2"], true).unwrap();
        let before: HashSet<&str> = original.split_whitespace().collect();
        let after: HashSet<&str> = readded.split_whitespace().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_missing_token() {
        let err = update_utility_classes("a b c", &["z"], &[], false).unwrap_err();
        assert_eq!(
            err,
            ClassError::TokenNotFound {
                token: "z".to_string(),
                current: "a b c".to_string(),
            }
        );
    }

    #[test]
    fn test_add_duplicate_token() {
        let err = update_utility_classes("bg-red-500", &[], &["bg-red-500"], false).unwrap_err();
        assert!(matches!(err, ClassError::DuplicateToken { .. }));
    }

    #[test]
    fn test_add_same_token_twice_in_one_call() {
        let err = update_utility_classes("flex", &[], &["p-2", "p-2"], true).unwrap_err();
        assert!(matches!(err, ClassError::DuplicateToken { ref token, .. } if token == "p-2"));
    }

    #[test]
    fn test_nothing_requested() {
        assert_eq!(
            update_utility_classes("a b", &[], &[], false),
            Err(ClassError::InvalidArgument)
        );
    }

    #[test]
    fn test_invalid_token() {
        let err = update_utility_classes("flex", &[], &["42px"], false).unwrap_err();
        assert_eq!(err, ClassError::InvalidToken("42px".to_string()));

        let err = update_utility_classes("flex", &[], &["Bg-red"], false).unwrap_err();
        assert_eq!(err, ClassError::InvalidToken("Bg-red".to_string()));
    }

    #[test]
    fn test_removes_first_occurrence_only() {
        let updated = update_utility_classes("p-2 m-1 p-2", &["p-2"], &[], false).unwrap();
        assert_eq!(updated, "m-1 p-2");
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let updated =
            update_utility_classes("  flex \n  items-center  ", &[], &["p-2"], false).unwrap();
        assert_eq!(updated, "flex items-center p-2");
    }

    #[test]
    fn test_collision_does_not_block_add() {
        let updated = update_utility_classes(
            "bg-slate-800 text-emerald-50",
            &[],
            &["bg-emerald-50"],
            false,
        )
        .unwrap();
        assert_eq!(updated, "bg-slate-800 text-emerald-50 bg-emerald-50");
    }

    #[test]
    fn test_class_prefix() {
        assert_eq!(class_prefix("bg-red-500"), Some("bg"));
        assert_eq!(class_prefix("hover:bg-slate-700"), Some("hover:bg"));
        assert_eq!(class_prefix("-mt-2"), Some("mt"));
        assert_eq!(class_prefix("flex"), Some("flex"));
        assert_eq!(class_prefix("2xl:p-4"), None);
        assert_eq!(class_prefix(""), None);
    }

    #[test]
    fn test_class_list_reports_collision() {
        let mut list = ClassList::parse("hover:bg-slate-700 text-emerald-50");

        let collision = list.add("bg-emerald-50", "").unwrap().unwrap();
        assert_eq!(collision.prefix, "bg");
        assert_eq!(collision.existing, vec!["hover:bg-slate-700"]);

        let none = list.add("px-4", "").unwrap();
        assert!(none.is_none());
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_ignore_prefix_warning_only_affects_logging() {
        let current = "hover:bg-slate-700 text-emerald-50";

        let warned = update_utility_classes(current, &[], &["bg-emerald-50"], false).unwrap();
        let quiet = update_utility_classes(current, &[], &["bg-emerald-50"], true).unwrap();
        assert_eq!(warned, quiet);
        assert_eq!(quiet, "hover:bg-slate-700 text-emerald-50 bg-emerald-50");

        let first = ClassList::parse(current).add("bg-emerald-50", current).unwrap();
        let second = ClassList::parse(current).add("bg-emerald-50", current).unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
