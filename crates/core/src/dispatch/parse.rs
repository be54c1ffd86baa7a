use super::node::{DispatchNode, DispatchNodeKind};
use crate::args::Value;
use crate::errors::ParseFailure;

pub(crate) enum ParseResult<'a> {
    Success {
        node: &'a DispatchNode,
        arguments: Vec<(String, Value)>,
        path: Vec<&'a DispatchNode>,
    },
    Partial {
        path: Vec<&'a DispatchNode>,
    },
    TooManyArguments {
        path: Vec<&'a DispatchNode>,
        remaining: String,
    },
    InvalidArgument {
        path: Vec<&'a DispatchNode>,
        remaining: String,
        failure: Option<ParseFailure>,
    },
    NothingMatched,
}

/// Walks the tree as far as the input allows, preferring literal matches and
/// falling back to argument parsers in declaration order.
pub(crate) fn parse<'a>(root: &'a DispatchNode, input: &str) -> ParseResult<'a> {
    let mut remaining_input = input;
    let mut path: Vec<&'a DispatchNode> = vec![root];
    let mut arguments: Vec<(String, Value)> = Vec::new();
    let mut last_failure: Option<ParseFailure> = None;

    while parse_next(
        &mut path,
        &mut arguments,
        &mut remaining_input,
        &mut last_failure,
    ) {}

    let final_node = *path.last().unwrap();

    if matches!(final_node.kind, DispatchNodeKind::Root) {
        return ParseResult::NothingMatched;
    }

    let remainder = remaining_input.trim_start();

    if !remainder.is_empty() {
        if final_node.has_executor() && final_node.children.is_empty() {
            ParseResult::TooManyArguments {
                path,
                remaining: remainder.to_string(),
            }
        } else {
            ParseResult::InvalidArgument {
                path,
                remaining: remainder.to_string(),
                failure: last_failure,
            }
        }
    } else if final_node.has_executor() {
        ParseResult::Success {
            node: final_node,
            arguments,
            path,
        }
    } else {
        ParseResult::Partial { path }
    }
}

fn parse_next<'a>(
    path: &mut Vec<&'a DispatchNode>,
    arguments: &mut Vec<(String, Value)>,
    remaining_input: &mut &str,
    last_failure: &mut Option<ParseFailure>,
) -> bool {
    let current_node = path.last().unwrap();

    for child in &current_node.children {
        match &child.kind {
            DispatchNodeKind::Root => continue,

            DispatchNodeKind::Literal { name, aliases } => {
                let input = remaining_input.trim_start();
                let Some((token, rest)) = consume_token(input) else {
                    continue;
                };

                if token == name || aliases.iter().any(|alias| alias == token) {
                    path.push(child);
                    *remaining_input = rest;
                    return true;
                }
            }

            DispatchNodeKind::Argument { name, parse, .. } => {
                match (**parse)(remaining_input) {
                    Ok((value, rest)) => {
                        path.push(child);
                        arguments.push((name.clone(), value));
                        *remaining_input = rest;
                        return true;
                    }
                    Err(failure) => {
                        // Remember the most recent diagnostic; if no sibling
                        // matches either, it is what the user gets to see.
                        *last_failure = Some(failure);
                    }
                }
            }
        }
    }

    false
}

fn consume_token(input: &str) -> Option<(&str, &str)> {
    if input.is_empty() {
        return None;
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some((&input[..end], &input[end..]))
}
