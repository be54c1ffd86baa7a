//! The native dispatch tree: the structure the host runtime actually walks
//! when a command line comes in. Managers lower their registered commands
//! into this tree during the registration pass.

mod node;
mod parse;
mod usage;

pub use node::{DispatchNode, NodeExecutor};

use crate::args::ArgumentSet;
use crate::errors::CommandError;
use crate::source::SourceHandle;
use parse::ParseResult;

pub struct Dispatcher {
    root: DispatchNode,
    custom_aliases: Vec<(String, String)>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            root: DispatchNode::root(),
            custom_aliases: Vec::new(),
        }
    }

    /// Installs a lowered command tree under the root.
    pub fn install(&mut self, command: DispatchNode) {
        self.root.children.push(command);
    }

    /// Adds a line-level alias: input starting with `prefix` is rewritten to
    /// `replacement` before parsing. `{}` in the replacement captures the
    /// rest of the line.
    pub fn add_custom_alias(&mut self, prefix: impl Into<String>, replacement: impl Into<String>) {
        self.custom_aliases
            .push((prefix.into(), replacement.into()));
    }

    fn expand_custom_aliases(&self, command_line: &str) -> String {
        for (alias, expansion) in &self.custom_aliases {
            if let Some(rest) = command_line.strip_prefix(alias.as_str()) {
                if expansion.contains("{}") {
                    return expansion.replace("{}", rest);
                } else {
                    return format!("{} {}", expansion, rest);
                }
            }
        }

        command_line.to_string()
    }

    /// Parses and executes one command line. All errors come back to the
    /// caller untranslated; the runtime owns the chat-message boundary.
    pub fn dispatch(
        &self,
        source: &SourceHandle,
        command_line: &str,
    ) -> Result<(), CommandError> {
        let command_line = command_line.trim();
        if command_line.is_empty() {
            return Ok(());
        }

        let command_line = self.expand_custom_aliases(command_line);

        match parse::parse(&self.root, &command_line) {
            ParseResult::Success {
                node, arguments, ..
            } => {
                let executor = node
                    .executor
                    .as_ref()
                    .expect("node must have an executor to parse successfully");
                (**executor)(source, ArgumentSet::new(arguments))
            }

            ParseResult::Partial { path } => Err(CommandError::InvalidSyntax {
                usage: usage::generate_usage(&path),
            }),

            ParseResult::TooManyArguments { path, .. } => Err(CommandError::InvalidSyntax {
                usage: usage::generate_usage(&path),
            }),

            ParseResult::InvalidArgument { path, failure, .. } => match failure {
                Some(failure) => Err(CommandError::ArgumentParse(failure)),
                None => Err(CommandError::InvalidSyntax {
                    usage: usage::generate_usage(&path),
                }),
            },

            ParseResult::NothingMatched => Err(CommandError::UnknownCommand),
        }
    }

    /// The `/help` anchor for a command line that failed to parse fully.
    pub fn base_name(&self, command_line: &str) -> Option<String> {
        let command_line = self.expand_custom_aliases(command_line.trim());
        match parse::parse(&self.root, &command_line) {
            ParseResult::NothingMatched => None,
            ParseResult::Success { path, .. }
            | ParseResult::Partial { path }
            | ParseResult::TooManyArguments { path, .. }
            | ParseResult::InvalidArgument { path, .. } => {
                Some(usage::generate_base_name(&path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ConsoleSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn console() -> SourceHandle {
        Arc::new(ConsoleSource)
    }

    #[test]
    fn custom_aliases_expand_before_parsing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut dispatcher = Dispatcher::new();
        dispatcher.install(DispatchNode::literal("toast").executes(Arc::new(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })));
        dispatcher.add_custom_alias("/tst", "toast");

        dispatcher.dispatch(&console(), "/tst").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_lines_are_ignored() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.dispatch(&console(), "   ").is_ok());
    }

    #[test]
    fn unknown_commands_are_reported() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher.dispatch(&console(), "missing").unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand));
    }
}
