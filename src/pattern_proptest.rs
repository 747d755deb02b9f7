//! Property-based tests for ignore rule evaluation.
//!
//! These tests use proptest to generate names and paths and check the
//! precedence and pruning laws hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::entry::Entry;
    use crate::filter::{is_dotted, Dotfiles, Filter};
    use crate::pattern::{Decision, RuleSet};
    use proptest::prelude::*;

    fn rules(lines: &[String]) -> RuleSet {
        RuleSet::from_patterns("generated", &lines.join("\n")).unwrap()
    }

    // ============================================================================
    // precedence
    // ============================================================================

    proptest! {
        /// Property: the later of two contradicting rules decides
        #[test]
        fn last_match_wins(name in "[a-z][a-z0-9_]{0,12}", dirs in prop::collection::vec("[a-z]{1,6}", 0..3)) {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&name);

            let include_last = rules(&[name.clone(), format!("!{}", name)]);
            prop_assert_eq!(include_last.decide(&path, false), Decision::Included);

            let exclude_last = rules(&[format!("!{}", name), name.clone()]);
            prop_assert_eq!(exclude_last.decide(&path, false), Decision::Excluded);
        }

        /// Property: appending the negation of every rule includes everything
        /// the rules matched
        #[test]
        fn negation_round_trip(names in prop::collection::vec("[a-z]{1,8}", 1..5), candidate in "[a-z]{1,8}") {
            let mut lines = names.clone();
            lines.extend(names.iter().map(|n| format!("!{}", n)));
            let set = rules(&lines);
            prop_assert_eq!(set.decide(&candidate, false), Decision::Included);
            prop_assert!(!set.is_excluded(&candidate, false));
        }

        /// Property: a rule without a slash matches its name at any depth
        #[test]
        fn unanchored_name_matches_at_any_depth(name in "[a-z]{1,8}", dirs in prop::collection::vec("[a-z]{1,6}", 0..4)) {
            let mut segments = dirs.clone();
            segments.push(name.clone());
            let set = rules(&[name.clone()]);
            prop_assert!(set.is_excluded(&segments.join("/"), false));
        }

        /// Property: a leading slash anchors the rule to the root
        #[test]
        fn rooted_rule_only_matches_top_level(name in "[a-z]{1,8}", dir in "[a-z]{1,6}") {
            let set = rules(&[format!("/{}", name)]);
            prop_assert!(set.is_excluded(&name, false));
            let nested = format!("{}/{}", dir, name);
            prop_assert_eq!(set.decide(&nested, false), Decision::Included);
        }

        /// Property: `*` excludes every path
        #[test]
        fn star_excludes_everything(path in "[a-zA-Z0-9_][a-zA-Z0-9_.]{0,9}(/[a-zA-Z0-9_][a-zA-Z0-9_.]{0,9}){0,3}") {
            let set = rules(&["*".to_string()]);
            prop_assert!(set.is_excluded(&path, false));
        }

        /// Property: an excluded directory excludes every descendant, whatever
        /// rules follow it
        #[test]
        fn excluded_ancestor_excludes_descendants(dir in "[a-z]{1,6}", child in "[a-z]{1,6}") {
            let set = rules(&[format!("{}/", dir), format!("!{}/{}", dir, child)]);
            let path = format!("{}/{}", dir, child);
            prop_assert!(set.is_excluded(&path, false));
        }

        /// Property: the deciding rule reported by explain agrees with decide
        #[test]
        fn explain_agrees_with_decide(names in prop::collection::vec("!?[a-c]{1,2}", 0..6), candidate in "[a-c]{1,2}") {
            let set = rules(&names);
            let expected = match set.explain(&candidate, false) {
                Some(rule) if !rule.is_negated() => Decision::Excluded,
                _ => Decision::Included,
            };
            prop_assert_eq!(set.decide(&candidate, false), expected);
        }
    }

    // ============================================================================
    // dotfile filter
    // ============================================================================

    proptest! {
        /// Property: paths without dotted segments are never dotfiles
        #[test]
        fn undotted_paths_pass(path in "[a-z0-9_]{1,8}(/[a-z0-9_][a-z0-9_.]{0,8}){0,3}") {
            prop_assert!(!is_dotted(&path));
            prop_assert!(!Dotfiles.exclude(&Entry::file(path, 0)));
        }

        /// Property: a dotted segment anywhere excludes the path
        #[test]
        fn dotted_segment_excludes(
            before in prop::collection::vec("[a-z]{1,6}", 0..3),
            dotted in "\\.[a-z0-9_]{1,8}",
            after in prop::collection::vec("[a-z]{1,6}", 0..3),
        ) {
            let mut segments = before;
            segments.push(dotted);
            segments.extend(after);
            let path = segments.join("/");
            prop_assert!(is_dotted(&path));
            prop_assert!(Dotfiles.exclude(&Entry::file(path, 0)));
        }
    }
}
