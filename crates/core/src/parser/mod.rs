//! Argument parser registration and resolution.
//!
//! Parsers are registered by value type and resolved once per registration
//! pass, before the command tree is handed to the dispatcher. Most parsers
//! are constant; a few can only be constructed against a [`BuildContext`]
//! (the host's registry snapshot), which is bound for the duration of one
//! registration pass and unbound afterwards.

mod descriptor;
mod registry;
mod scope;
pub mod standard;

pub use descriptor::{ParseFn, ParserDescriptor};
pub use registry::ParserRegistry;
pub use scope::{with_build_context, BuildContextScope};

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// The value types arguments can be declared with. Each maps to a parser
/// registered under [`ValueType::key`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    String,
    GreedyString,
    Integer { min: i32, max: i32 },
    Float { min: f32, max: f32 },
    Boolean,
    Angle,
    Time,
    IntRange,
    Identifier,
    NamedColor,
    RegistryEntry { registry: String },
}

impl ValueType {
    pub fn integer() -> ValueType {
        ValueType::Integer {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    pub fn integer_in(min: i32, max: i32) -> ValueType {
        ValueType::Integer { min, max }
    }

    pub fn float() -> ValueType {
        ValueType::Float {
            min: f32::MIN,
            max: f32::MAX,
        }
    }

    pub fn registry_entry(registry: impl Into<String>) -> ValueType {
        ValueType::RegistryEntry {
            registry: registry.into(),
        }
    }

    /// The parser registry key for this value type.
    pub fn key(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::GreedyString => "greedy_string",
            ValueType::Integer { .. } => "integer",
            ValueType::Float { .. } => "float",
            ValueType::Boolean => "boolean",
            ValueType::Angle => "angle",
            ValueType::Time => "time",
            ValueType::IntRange => "int_range",
            ValueType::Identifier => "identifier",
            ValueType::NamedColor => "named_color",
            ValueType::RegistryEntry { .. } => "registry_entry",
        }
    }

    /// Greedy types consume the rest of the line and render as trailing
    /// optionals in usage strings.
    pub(crate) fn is_greedy(&self) -> bool {
        matches!(self, ValueType::GreedyString)
    }
}

/// Snapshot of the host's registries, supplied by the platform when the
/// registration event fires. Contextual parsers are constructed against
/// this; it is never consulted at invocation time.
#[derive(Debug, Default, Clone)]
pub struct BuildContext {
    registries: FxHashMap<String, Arc<FxHashSet<String>>>,
}

impl BuildContext {
    pub fn new() -> BuildContext {
        BuildContext::default()
    }

    /// Adds a registry under `name`. Entries are canonical identifier
    /// strings; bare paths are stored under the default namespace.
    pub fn with_registry<I, S>(mut self, name: impl Into<String>, entries: I) -> BuildContext
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| {
                let entry = entry.into();
                if entry.contains(':') {
                    entry
                } else {
                    format!("{}:{entry}", crate::args::DEFAULT_NAMESPACE)
                }
            })
            .collect();
        self.registries.insert(name.into(), Arc::new(entries));
        self
    }

    pub fn registry(&self, name: &str) -> Option<Arc<FxHashSet<String>>> {
        self.registries.get(name).cloned()
    }
}
