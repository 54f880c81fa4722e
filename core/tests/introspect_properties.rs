//! Property tests for sub-command collection.

use std::collections::BTreeMap;

use command_docs_core::{Action, IntrospectOptions, StaticParser, introspect};
use proptest::prelude::*;

/// One registration: (action index, command name, marker).
fn registrations() -> impl Strategy<Value = Vec<(usize, String, u32)>> {
    prop::collection::vec(
        (0usize..3, prop::sample::select(vec!["create", "extract", "list", "help"]), any::<u32>()),
        1..24,
    )
    .prop_map(|regs| {
        regs.into_iter()
            .map(|(action, name, marker)| (action, name.to_string(), marker))
            .collect()
    })
}

fn build_root(regs: &[(usize, String, u32)]) -> StaticParser {
    let mut root = StaticParser::new("prog", "prog");
    for action in 0..3 {
        let choices: Vec<(String, StaticParser)> = regs
            .iter()
            .filter(|(a, _, _)| *a == action)
            .map(|(_, name, marker)| {
                let parser = StaticParser::new(name, &format!("prog {name}"))
                    .with_description(&marker.to_string());
                (name.clone(), parser)
            })
            .collect();
        root = root.with_action(Action::with_choices(&format!("action{action}"), choices));
    }
    root
}

proptest! {
    #[test]
    fn last_registration_wins(regs in registrations()) {
        let root = build_root(&regs);
        let tree = introspect(&root, &IntrospectOptions::default()).unwrap();

        // Actions are walked in order, choices in registration order.
        let mut expected: BTreeMap<String, u32> = BTreeMap::new();
        for action in 0..3 {
            for (_, name, marker) in regs.iter().filter(|(a, _, _)| *a == action) {
                expected.insert(name.clone(), *marker);
            }
        }

        prop_assert_eq!(tree.commands.len(), expected.len());
        for (name, marker) in expected {
            let node = &tree.commands[&name];
            let expected_marker = marker.to_string();
            prop_assert_eq!(node.description.as_deref(), Some(expected_marker.as_str()));
        }
    }

    #[test]
    fn introspection_is_deterministic(regs in registrations()) {
        let root = build_root(&regs);
        let first = introspect(&root, &IntrospectOptions::default()).unwrap();
        let second = introspect(&root, &IntrospectOptions::default()).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn same_name_across_actions_keeps_one_entry() {
    let root = StaticParser::new("prog", "prog")
        .with_action(Action::plain("verbose"))
        .with_action(Action::with_choices(
            "a",
            vec![("list".to_string(), StaticParser::new("list", "prog list").with_description("from a"))],
        ))
        .with_action(Action::with_choices(
            "b",
            vec![("list".to_string(), StaticParser::new("list", "prog list").with_description("from b"))],
        ));

    let tree = introspect(&root, &IntrospectOptions::default()).unwrap();
    assert_eq!(tree.command_names(), vec!["list"]);
    assert_eq!(tree.commands["list"].description.as_deref(), Some("from b"));
}
