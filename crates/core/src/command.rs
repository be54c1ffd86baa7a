//! The command model applications build against. Trees declared here are
//! unresolved: arguments name a [`ValueType`], not a parse function, and
//! handlers speak the application's sender type. A manager lowers them onto
//! the native dispatch tree during the registration pass.

use crate::context::CommandContext;
use crate::errors::CommandResult;
use crate::parser::ValueType;
use std::sync::Arc;

pub type CommandHandler<C> =
    Arc<dyn Fn(&mut CommandContext<'_, C>) -> CommandResult<()> + Send + Sync>;

pub struct CommandNode<C> {
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<CommandNode<C>>,
    pub(crate) handler: Option<CommandHandler<C>>,
    pub(crate) permissions: Vec<String>,
    pub(crate) player_only: bool,
}

pub(crate) enum NodeKind {
    Literal {
        name: String,
        aliases: Vec<String>,
    },
    Argument {
        name: String,
        value_type: ValueType,
    },
}

impl<C> CommandNode<C> {
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Literal {
                name: name.into(),
                aliases: Vec::new(),
            },
            children: Vec::new(),
            handler: None,
            permissions: Vec::new(),
            player_only: false,
        }
    }

    pub fn argument(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            kind: NodeKind::Argument {
                name: name.into(),
                value_type,
            },
            children: Vec::new(),
            handler: None,
            permissions: Vec::new(),
            player_only: false,
        }
    }

    pub fn then(mut self, child: CommandNode<C>) -> Self {
        self.children.push(child);
        self
    }

    pub fn executes<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut CommandContext<'_, C>) -> CommandResult<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let NodeKind::Literal { aliases, .. } = &mut self.kind else {
            panic!("can not create an alias for non-literal command nodes")
        };
        aliases.push(alias.into());
        self
    }

    /// Requires `permission` on this node and everything below it.
    pub fn require_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Restricts this subtree to player senders.
    pub fn player_only(mut self) -> Self {
        self.player_only = true;
        self
    }

    pub(crate) fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Literal { name, .. } => name,
            NodeKind::Argument { name, .. } => name,
        }
    }

    /// Every permission node referenced in this tree, for the registration
    /// scan.
    pub(crate) fn collect_permissions(&self, into: &mut Vec<String>) {
        into.extend(self.permissions.iter().cloned());
        for child in &self.children {
            child.collect_permissions(into);
        }
    }
}
