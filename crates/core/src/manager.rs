//! Command managers adapt an application command set onto the runtime's
//! native dispatch tree.
//!
//! A manager is constructed against a [`ServerRuntime`] and registers
//! unresolved command trees. When the runtime's registration event fires,
//! each attached manager lowers its trees: argument parsers are resolved
//! against the pass's build context, and executable nodes get a bridge
//! closure that maps the native source to the application sender, enforces
//! permissions, and runs the handler.

use crate::command::{CommandNode, NodeKind};
use crate::context::CommandContext;
use crate::dispatch::{DispatchNode, Dispatcher, NodeExecutor};
use crate::errors::{CommandError, SetupError, SetupResult};
use crate::parser::{ParserDescriptor, ParserRegistry};
use crate::permissions::PermissionEngine;
use crate::runtime::ServerRuntime;
use crate::sender::SenderMapper;
use std::sync::{Arc, Mutex, Weak};
use tracing::warn;

/// Which dispatch tree a manager's commands belong to. Server commands are
/// built once, when the server starts; client commands rebuild on every
/// connection and are therefore exempt from the registration gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Server,
    Client,
}

/// Type-erased view of a manager, held weakly by the runtime.
pub(crate) trait AttachedManager: Send + Sync {
    fn lower_into(&self, dispatcher: &mut Dispatcher) -> SetupResult<()>;

    /// `(command root, permission node)` pairs for the registration scan.
    fn permission_references(&self) -> Vec<(String, String)>;
}

pub struct CommandManager<C> {
    environment: Environment,
    mapper: Arc<dyn SenderMapper<C>>,
    parsers: Mutex<ParserRegistry>,
    commands: Mutex<Vec<CommandNode<C>>>,
    permissions: Arc<PermissionEngine>,
    runtime: Weak<ServerRuntime>,
}

impl<C: 'static> CommandManager<C> {
    /// Creates a server-context manager.
    ///
    /// Fails fast once the server has begun starting: the dispatch tree has
    /// already been built at that point and anything registered later would
    /// be silently unreachable.
    pub fn server(
        runtime: &Arc<ServerRuntime>,
        mapper: Arc<dyn SenderMapper<C>>,
    ) -> SetupResult<Arc<Self>> {
        if runtime.gate().is_closed() {
            return Err(SetupError::LateRegistration);
        }
        let manager = Arc::new(Self::new(Environment::Server, runtime, mapper));
        runtime.attach(Arc::downgrade(&manager) as Weak<dyn AttachedManager>);
        Ok(manager)
    }

    /// Creates a client-context manager. Client command trees are rebuilt
    /// per connection, so construction is allowed at any time.
    pub fn client(
        runtime: &Arc<ServerRuntime>,
        mapper: Arc<dyn SenderMapper<C>>,
    ) -> Arc<Self> {
        let manager = Arc::new(Self::new(Environment::Client, runtime, mapper));
        runtime.attach(Arc::downgrade(&manager) as Weak<dyn AttachedManager>);
        manager
    }

    fn new(
        environment: Environment,
        runtime: &Arc<ServerRuntime>,
        mapper: Arc<dyn SenderMapper<C>>,
    ) -> Self {
        Self {
            environment,
            mapper,
            parsers: Mutex::new(ParserRegistry::with_defaults()),
            commands: Mutex::new(Vec::new()),
            permissions: runtime.permissions().clone(),
            runtime: Arc::downgrade(runtime),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Registers (or replaces) an argument parser supplier on this manager.
    pub fn register_parser(&self, key: impl Into<String>, descriptor: ParserDescriptor) {
        self.parsers.lock().unwrap().register(key, descriptor);
    }

    /// Registers a command tree. Must be rooted at a literal.
    ///
    /// Server managers reject registration once the dispatch tree has been
    /// built. Client managers accept late registrations and install them
    /// immediately, against the build context of the current connection.
    pub fn register(&self, command: CommandNode<C>) -> SetupResult<()> {
        if matches!(command.kind, NodeKind::Argument { .. }) {
            return Err(SetupError::NonLiteralRoot {
                name: command.name().to_string(),
            });
        }

        let runtime = self.runtime.upgrade();
        let started = runtime
            .as_ref()
            .map(|runtime| runtime.gate().is_closed())
            .unwrap_or(false);

        match self.environment {
            Environment::Server if started => {
                warn!(
                    "command /{} was registered after the server dispatch tree was built \
                     and would never be reachable",
                    command.name()
                );
                Err(SetupError::LateRegistration)
            }
            Environment::Client if started => {
                let runtime = runtime.expect("a started runtime is still alive");
                for node in self.tree_permissions(&command) {
                    if !self.permissions.is_declared(&node) {
                        return Err(SetupError::UnregisteredPermissionNode {
                            node,
                            command: command.name().to_string(),
                        });
                    }
                }
                let context = runtime
                    .current_build_context()
                    .expect("a started runtime has a build context");
                let lowered = crate::parser::with_build_context(context, || {
                    self.lower_command(&command)
                })?;
                runtime.install_late(lowered);
                self.commands.lock().unwrap().push(command);
                Ok(())
            }
            _ => {
                self.commands.lock().unwrap().push(command);
                Ok(())
            }
        }
    }

    fn tree_permissions(&self, command: &CommandNode<C>) -> Vec<String> {
        let mut nodes = Vec::new();
        command.collect_permissions(&mut nodes);
        nodes
    }

    fn lower_command(&self, command: &CommandNode<C>) -> SetupResult<DispatchNode> {
        let parsers = self.parsers.lock().unwrap();
        self.lower_node(&parsers, command, &[], false)
    }

    fn lower_node(
        &self,
        parsers: &ParserRegistry,
        node: &CommandNode<C>,
        inherited_permissions: &[String],
        inherited_player_only: bool,
    ) -> SetupResult<DispatchNode> {
        let mut permissions = inherited_permissions.to_vec();
        permissions.extend(node.permissions.iter().cloned());
        let player_only = inherited_player_only || node.player_only;

        let mut lowered = match &node.kind {
            NodeKind::Literal { name, aliases } => {
                let mut literal = DispatchNode::literal(name);
                for alias in aliases {
                    literal = literal.alias(alias);
                }
                literal
            }
            NodeKind::Argument { name, value_type } => DispatchNode::argument(
                name,
                parsers.resolve(value_type)?,
                value_type.is_greedy(),
            ),
        };

        if let Some(handler) = &node.handler {
            lowered = lowered.executes(self.bridge_executor(
                handler.clone(),
                permissions.clone(),
                player_only,
            ));
        }

        for child in &node.children {
            lowered = lowered.then(self.lower_node(parsers, child, &permissions, player_only)?);
        }

        Ok(lowered)
    }

    /// The closure the native dispatcher invokes. Maps the native source to
    /// the application sender, resolves it back for messaging, checks the
    /// accumulated permission path, then runs the handler.
    fn bridge_executor(
        &self,
        handler: crate::command::CommandHandler<C>,
        permission_nodes: Vec<String>,
        player_only: bool,
    ) -> NodeExecutor {
        let mapper = self.mapper.clone();
        let permissions = self.permissions.clone();
        Arc::new(move |source, args| {
            let sender = mapper.map(source.clone());
            let native = mapper.reverse(&sender);

            if player_only && !native.is_player() {
                return Err(CommandError::InvalidSender {
                    expected: "player",
                    actual: "console",
                });
            }
            for node in &permission_nodes {
                if !permissions.check(&*native, node) {
                    return Err(CommandError::NoPermission { node: node.clone() });
                }
            }

            let mut context = CommandContext::new(sender, native, &args);
            (*handler)(&mut context)
        })
    }
}

impl<C: 'static> AttachedManager for CommandManager<C> {
    fn lower_into(&self, dispatcher: &mut Dispatcher) -> SetupResult<()> {
        let commands = self.commands.lock().unwrap();
        for command in commands.iter() {
            dispatcher.install(self.lower_command(command)?);
        }
        Ok(())
    }

    fn permission_references(&self) -> Vec<(String, String)> {
        let commands = self.commands.lock().unwrap();
        let mut references = Vec::new();
        for command in commands.iter() {
            for node in self.tree_permissions(command) {
                references.push((command.name().to_string(), node));
            }
        }
        references
    }
}
