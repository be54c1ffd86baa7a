use super::node::{DispatchNode, DispatchNodeKind};
use itertools::Itertools;
use std::collections::HashSet;

/// Builds the corrected usage string for a partially matched path, e.g.
/// `/toast hugs <count>` or `/scan (block | entity) <id>`.
pub(crate) fn generate_usage(path: &[&DispatchNode]) -> String {
    let mut parts = Vec::new();

    for node in &path[1..] {
        parts.push(display_name(node));
    }

    let current_node = path.last().unwrap();
    let suffix = build_usage_suffix(current_node);
    if !suffix.is_empty() {
        parts.push(suffix);
    }

    format!("/{}", parts.join(" "))
}

fn build_usage_suffix(node: &DispatchNode) -> String {
    if node.children.is_empty() {
        return String::new();
    }

    let (greedy_children, regular_children): (Vec<_>, Vec<_>) =
        node.children.iter().partition(|child| is_greedy(child));

    let mut trailing_optionals: HashSet<String> = greedy_children
        .iter()
        .map(|child| display_name(child))
        .collect();

    // A node that can already execute makes everything after it optional.
    let children_optional = node.has_executor() || !greedy_children.is_empty();

    let mut parts = Vec::new();
    if !regular_children.is_empty() {
        let mut alternatives = Vec::new();
        for child in &regular_children {
            let name = display_name(child);
            let nested = build_usage_suffix(child);
            // Nested greedy tails bubble up as their own optionals.
            if nested.starts_with('[') && child.has_executor() {
                trailing_optionals.insert(nested);
                alternatives.push(name);
            } else if nested.is_empty() {
                alternatives.push(name);
            } else {
                alternatives.push(format!("{name} {nested}"));
            }
        }
        let joined = alternatives.join(" | ");
        let grouped = if alternatives.len() > 1 {
            format!("({joined})")
        } else {
            joined
        };
        if children_optional {
            parts.push(format!("[{grouped}]"));
        } else {
            parts.push(grouped);
        }
    }

    for optional in trailing_optionals.into_iter().sorted() {
        if optional.starts_with('[') {
            parts.push(optional);
        } else {
            parts.push(format!("[{optional}]"));
        }
    }

    parts.join(" ")
}

fn is_greedy(node: &DispatchNode) -> bool {
    matches!(&node.kind, DispatchNodeKind::Argument { greedy: true, .. })
}

fn display_name(node: &DispatchNode) -> String {
    match &node.kind {
        DispatchNodeKind::Root => unreachable!(),
        DispatchNodeKind::Literal { name, .. } => name.clone(),
        DispatchNodeKind::Argument { name, .. } => format!("<{name}>"),
    }
}

/// The literal prefix of the path, used to point users at `/help`.
pub(crate) fn generate_base_name(path: &[&DispatchNode]) -> String {
    let mut parts = Vec::new();

    for node in path {
        match &node.kind {
            DispatchNodeKind::Root => {}
            DispatchNodeKind::Literal { name, .. } => parts.push(name.as_str()),
            DispatchNodeKind::Argument { .. } => break,
        }
    }

    format!("/{}", parts.iter().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::standard::{parse_greedy_string, parse_string};
    use expect_test::expect;
    use std::sync::Arc;

    fn noop() -> crate::dispatch::node::NodeExecutor {
        Arc::new(|_, _| Ok(()))
    }

    fn arg(name: &str) -> DispatchNode {
        DispatchNode::argument(name, Arc::new(parse_string), false)
    }

    fn greedy(name: &str) -> DispatchNode {
        DispatchNode::argument(name, Arc::new(parse_greedy_string), true)
    }

    #[test]
    fn missing_argument_usage() {
        let root = DispatchNode::root().then(
            DispatchNode::literal("toast")
                .then(DispatchNode::literal("hugs").then(arg("count").executes(noop()))),
        );
        let path = vec![&root, &root.children[0], &root.children[0].children[0]];
        expect![[r#"/toast hugs <count>"#]].assert_eq(&generate_usage(&path));
    }

    #[test]
    fn alternatives_group_with_pipes() {
        let root = DispatchNode::root().then(
            DispatchNode::literal("scan")
                .then(DispatchNode::literal("block").executes(noop()))
                .then(DispatchNode::literal("entity").executes(noop())),
        );
        let path = vec![&root, &root.children[0]];
        expect![[r#"/scan (block | entity)"#]].assert_eq(&generate_usage(&path));
    }

    #[test]
    fn executable_node_makes_children_optional() {
        let root = DispatchNode::root().then(
            DispatchNode::literal("wave")
                .executes(noop())
                .then(arg("target").executes(noop())),
        );
        let path = vec![&root, &root.children[0]];
        expect![[r#"/wave [<target>]"#]].assert_eq(&generate_usage(&path));
    }

    #[test]
    fn greedy_tail_renders_as_trailing_optional() {
        let root = DispatchNode::root().then(
            DispatchNode::literal("say")
                .executes(noop())
                .then(greedy("message").executes(noop())),
        );
        let path = vec![&root, &root.children[0]];
        expect![[r#"/say [<message>]"#]].assert_eq(&generate_usage(&path));
    }

    #[test]
    fn base_name_stops_at_arguments() {
        let root = DispatchNode::root().then(
            DispatchNode::literal("toast")
                .then(DispatchNode::literal("hugs").then(arg("count").executes(noop()))),
        );
        let toast = &root.children[0];
        let hugs = &toast.children[0];
        let count = &hugs.children[0];
        let path = vec![&root, toast, hugs, count];
        assert_eq!(generate_base_name(&path), "/toast hugs");
    }
}
