use crate::args::ArgumentSet;
use crate::errors::CommandError;
use crate::parser::ParseFn;
use crate::source::SourceHandle;
use std::sync::Arc;

/// Bridge closure installed on executable nodes. Built by a command manager
/// during the registration pass; wraps sender mapping, permission checks and
/// the application handler.
pub type NodeExecutor =
    Arc<dyn Fn(&SourceHandle, ArgumentSet) -> Result<(), CommandError> + Send + Sync>;

/// A node of the native dispatch tree. Argument nodes carry parse functions
/// already resolved against the registration pass's build context.
#[derive(Clone)]
pub struct DispatchNode {
    pub(crate) kind: DispatchNodeKind,
    pub(crate) children: Vec<DispatchNode>,
    pub(crate) executor: Option<NodeExecutor>,
}

#[derive(Clone)]
pub(crate) enum DispatchNodeKind {
    Root,
    Literal {
        name: String,
        aliases: Vec<String>,
    },
    Argument {
        name: String,
        parse: ParseFn,
        greedy: bool,
    },
}

impl DispatchNode {
    pub fn root() -> Self {
        Self {
            kind: DispatchNodeKind::Root,
            children: Vec::new(),
            executor: None,
        }
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            kind: DispatchNodeKind::Literal {
                name: name.into(),
                aliases: Vec::new(),
            },
            children: Vec::new(),
            executor: None,
        }
    }

    pub fn argument(name: impl Into<String>, parse: ParseFn, greedy: bool) -> Self {
        Self {
            kind: DispatchNodeKind::Argument {
                name: name.into(),
                parse,
                greedy,
            },
            children: Vec::new(),
            executor: None,
        }
    }

    pub fn then(mut self, child: DispatchNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn executes(mut self, executor: NodeExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let DispatchNodeKind::Literal { aliases, .. } = &mut self.kind else {
            panic!("can not create an alias for non-literal command nodes")
        };
        aliases.push(alias.into());
        self
    }

    pub(crate) fn has_executor(&self) -> bool {
        self.executor.is_some()
    }
}
