#![deny(rust_2018_idioms)]

pub mod args;
pub mod captions;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod errors;
pub mod gate;
pub mod manager;
pub mod parser;
pub mod permissions;
pub mod runtime;
pub mod sender;
pub mod source;
pub mod translate;

pub use args::{Angle, ArgumentSet, GameTime, Identifier, IntRange, Value};
pub use command::{CommandHandler, CommandNode};
pub use context::CommandContext;
pub use errors::{CommandError, CommandResult, ParseFailure, SetupError, SetupResult};
pub use manager::{CommandManager, Environment};
pub use parser::{BuildContext, ParserDescriptor, ParserRegistry, ValueType};
pub use runtime::{RuntimeSettings, ServerRuntime};
pub use sender::{NativeSenderMapper, SenderMapper};
pub use source::{CommandSource, ConsoleSource, SourceHandle};
pub use translate::ExceptionTranslator;
