//! The host-runtime shim: lifecycle events, the registration gate, the
//! native dispatcher, and the single registration pass that ties them
//! together.

use crate::captions::CaptionRegistry;
use crate::dispatch::{DispatchNode, Dispatcher};
use crate::errors::{CommandError, SetupError, SetupResult};
use crate::gate::RegistrationGate;
use crate::manager::AttachedManager;
use crate::parser::{with_build_context, BuildContext};
use crate::permissions::PermissionEngine;
use crate::source::SourceHandle;
use crate::translate::ExceptionTranslator;
use std::sync::{Arc, Mutex, RwLock, Weak};
use tracing::{debug, info};

pub struct RuntimeSettings {
    /// Operator level a source needs when no explicit permission grant
    /// matches.
    pub op_permission_level: u8,
    pub captions: CaptionRegistry,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            op_permission_level: 4,
            captions: CaptionRegistry::with_defaults(),
        }
    }
}

/// Owns everything with process lifetime: the registration gate, the
/// dispatch tree, the permission engine and the exception translator.
/// Created explicitly by the host and torn down by dropping it; nothing
/// here lives in a static.
pub struct ServerRuntime {
    gate: RegistrationGate,
    dispatcher: RwLock<Dispatcher>,
    managers: Mutex<Vec<Weak<dyn AttachedManager>>>,
    permissions: Arc<PermissionEngine>,
    translator: Arc<ExceptionTranslator>,
    build_context: Mutex<Option<Arc<BuildContext>>>,
}

impl ServerRuntime {
    pub fn new(settings: RuntimeSettings) -> Arc<ServerRuntime> {
        let translator = ExceptionTranslator::new(settings.captions);
        let permissions = PermissionEngine::new(settings.op_permission_level);
        // The debug affordance node is part of this layer's own surface.
        permissions.declare_node(translator.hover_stacktrace_node());
        Arc::new(ServerRuntime {
            gate: RegistrationGate::new(),
            dispatcher: RwLock::new(Dispatcher::new()),
            managers: Mutex::new(Vec::new()),
            permissions: Arc::new(permissions),
            translator: Arc::new(translator),
            build_context: Mutex::new(None),
        })
    }

    pub fn gate(&self) -> &RegistrationGate {
        &self.gate
    }

    pub fn permissions(&self) -> &Arc<PermissionEngine> {
        &self.permissions
    }

    pub fn translator(&self) -> &Arc<ExceptionTranslator> {
        &self.translator
    }

    pub(crate) fn attach(&self, manager: Weak<dyn AttachedManager>) {
        self.managers.lock().unwrap().push(manager);
    }

    /// Line-level alias, expanded before parsing (`{}` captures the rest of
    /// the line).
    pub fn add_command_alias(&self, prefix: impl Into<String>, replacement: impl Into<String>) {
        self.dispatcher
            .write()
            .unwrap()
            .add_custom_alias(prefix, replacement);
    }

    /// The server-starting event: closes the registration gate and runs the
    /// registration pass.
    ///
    /// The build context is bound for the duration of the pass, every
    /// attached manager lowers its commands into the dispatch tree, and the
    /// pass finishes with the permission scan. Runs once; a second call is a
    /// setup error.
    pub fn start(&self, context: BuildContext) -> SetupResult<()> {
        if !self.gate.close() {
            return Err(SetupError::AlreadyStarted);
        }
        info!("server starting, building command dispatch tree");

        let context = Arc::new(context);
        *self.build_context.lock().unwrap() = Some(context.clone());

        let managers: Vec<Arc<dyn AttachedManager>> = self
            .managers
            .lock()
            .unwrap()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        {
            let mut dispatcher = self.dispatcher.write().unwrap();
            with_build_context(context, || -> SetupResult<()> {
                for manager in &managers {
                    manager.lower_into(&mut dispatcher)?;
                }
                Ok(())
            })?;
        }
        debug!(managers = managers.len(), "command trees lowered");

        for manager in &managers {
            for (command, node) in manager.permission_references() {
                if !self.permissions.is_declared(&node) {
                    return Err(SetupError::UnregisteredPermissionNode { node, command });
                }
            }
        }

        Ok(())
    }

    pub(crate) fn current_build_context(&self) -> Option<Arc<BuildContext>> {
        self.build_context.lock().unwrap().clone()
    }

    pub(crate) fn install_late(&self, command: DispatchNode) {
        self.dispatcher.write().unwrap().install(command);
    }

    /// Native dispatch entry point. Parses and executes one command line on
    /// the calling thread; every failure is translated to a chat message
    /// here, once, and then returned for the host's own logging.
    pub fn execute(&self, source: &SourceHandle, line: &str) -> Result<(), CommandError> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);

        let result = self.dispatcher.read().unwrap().dispatch(source, line);

        if let Err(error) = &result {
            let show_stacktrace = error.trace().is_some()
                && self
                    .permissions
                    .check(&**source, self.translator.hover_stacktrace_node());
            self.translator.handle(&**source, error, show_stacktrace);

            if matches!(error, CommandError::InvalidSyntax { .. }) {
                if let Some(base) = self.dispatcher.read().unwrap().base_name(line) {
                    source.send_message(crate::context::legacy_component(&format!(
                        "&eRun &6/help {}&e for more information.",
                        base.trim_start_matches('/')
                    )));
                }
            }
        }

        result
    }
}
