use super::scope::BuildContextScope;
use super::{standard, ParseFn, ParserDescriptor, ValueType};
use crate::errors::{SetupError, SetupResult};
use rustc_hash::FxHashMap;

/// Parser suppliers keyed by value type. Resolution happens once per
/// registration pass while the tree is lowered, never per invocation, so a
/// pass always sees one consistent registry snapshot.
pub struct ParserRegistry {
    parsers: FxHashMap<String, ParserDescriptor>,
}

impl ParserRegistry {
    pub fn empty() -> ParserRegistry {
        ParserRegistry {
            parsers: FxHashMap::default(),
        }
    }

    /// A registry with the standard parser set installed.
    pub fn with_defaults() -> ParserRegistry {
        let mut registry = ParserRegistry::empty();
        standard::register_defaults(&mut registry);
        registry
    }

    /// Registers (or replaces) the parser supplier for `key`.
    pub fn register(&mut self, key: impl Into<String>, descriptor: ParserDescriptor) {
        self.parsers.insert(key.into(), descriptor);
    }

    /// Resolves the parse function for a declared value type.
    ///
    /// Contextual suppliers require a bound build context and panic without
    /// one; an unknown key is a setup error surfaced to the caller.
    pub fn resolve(&self, value_type: &ValueType) -> SetupResult<ParseFn> {
        let key = value_type.key();
        let descriptor = self
            .parsers
            .get(key)
            .ok_or_else(|| SetupError::UnknownParser {
                key: key.to_string(),
            })?;
        Ok(match descriptor {
            ParserDescriptor::Constant(factory) => factory(value_type),
            ParserDescriptor::Contextual(factory) => {
                let context = BuildContextScope::expect_current(key);
                factory(value_type, &context)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{with_build_context, BuildContext};
    use std::sync::Arc;

    #[test]
    fn unknown_key_is_a_setup_error() {
        let registry = ParserRegistry::empty();
        let Err(err) = registry.resolve(&ValueType::Boolean) else {
            panic!("expected an unknown-parser setup error");
        };
        assert!(matches!(err, SetupError::UnknownParser { key } if key == "boolean"));
    }

    #[test]
    #[should_panic(expected = "outside a registration pass")]
    fn contextual_resolution_without_context_panics() {
        let registry = ParserRegistry::with_defaults();
        let _ = registry.resolve(&ValueType::registry_entry("item"));
    }

    #[test]
    fn contextual_resolution_with_context_succeeds() {
        let registry = ParserRegistry::with_defaults();
        let context = Arc::new(BuildContext::new().with_registry("item", ["stone"]));
        let parse = with_build_context(context, || {
            registry.resolve(&ValueType::registry_entry("item")).unwrap()
        });
        assert!((*parse)("stone").is_ok());
    }
}
