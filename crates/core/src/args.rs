use crate::errors::{CommandError, CommandResult};
use lectern_text::ColorCode;
use rustc_hash::FxHashMap;
use std::fmt;

/// A namespaced identifier, `namespace:path`. The same character rules as
/// vanilla resource locations: `[a-z0-9_.-]` for the namespace, additionally
/// `/` for the path. A bare `path` defaults to the `minecraft` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub namespace: String,
    pub path: String,
}

pub const DEFAULT_NAMESPACE: &str = "minecraft";

impl Identifier {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Identifier {
        Identifier {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    pub fn parse(input: &str) -> Option<Identifier> {
        let (namespace, path) = match input.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (DEFAULT_NAMESPACE, input),
        };
        if namespace.is_empty() || path.is_empty() {
            return None;
        }
        let namespace_ok = namespace
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-'));
        let path_ok = path
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-' | '/'));
        if !namespace_ok || !path_ok {
            return None;
        }
        Some(Identifier::new(namespace, path))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// An inclusive integer range, written `min..max`. A single integer is the
/// degenerate range `n..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// A duration in game ticks, parsed from `t` (ticks), `s` (seconds) or
/// `d` (in-game days) suffixed numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTime {
    pub ticks: i64,
}

impl GameTime {
    pub const TICKS_PER_SECOND: i64 = 20;
    pub const TICKS_PER_DAY: i64 = 24000;
}

/// An angle in degrees, normalized to `[-180, 180)`, optionally relative
/// (`~15` means 15 degrees from the sender's current rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    pub degrees: f32,
    pub relative: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    GreedyString(String),
    Integer(i32),
    Float(f32),
    Boolean(bool),
    Angle(Angle),
    Time(GameTime),
    IntRange(IntRange),
    Identifier(Identifier),
    NamedColor(ColorCode),
    RegistryEntry { registry: String, id: Identifier },
}

impl Value {
    fn type_error(&self, expected: &str) -> CommandError {
        CommandError::internal(format!(
            "argument {self:?} has wrong type, expected {expected} (command registration bug)"
        ))
    }

    pub(crate) fn as_string(&self) -> CommandResult<&String> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.type_error("String")),
        }
    }

    pub(crate) fn as_greedy(&self) -> CommandResult<&String> {
        match self {
            Value::GreedyString(s) => Ok(s),
            _ => Err(self.type_error("GreedyString")),
        }
    }

    pub(crate) fn as_integer(&self) -> CommandResult<i32> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.type_error("Integer")),
        }
    }

    pub(crate) fn as_float(&self) -> CommandResult<f32> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(self.type_error("Float")),
        }
    }

    pub(crate) fn as_boolean(&self) -> CommandResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.type_error("Boolean")),
        }
    }

    pub(crate) fn as_angle(&self) -> CommandResult<Angle> {
        match self {
            Value::Angle(a) => Ok(*a),
            _ => Err(self.type_error("Angle")),
        }
    }

    pub(crate) fn as_time(&self) -> CommandResult<GameTime> {
        match self {
            Value::Time(t) => Ok(*t),
            _ => Err(self.type_error("Time")),
        }
    }

    pub(crate) fn as_int_range(&self) -> CommandResult<IntRange> {
        match self {
            Value::IntRange(r) => Ok(*r),
            _ => Err(self.type_error("IntRange")),
        }
    }

    pub(crate) fn as_identifier(&self) -> CommandResult<&Identifier> {
        match self {
            Value::Identifier(id) => Ok(id),
            _ => Err(self.type_error("Identifier")),
        }
    }

    pub(crate) fn as_named_color(&self) -> CommandResult<ColorCode> {
        match self {
            Value::NamedColor(c) => Ok(*c),
            _ => Err(self.type_error("NamedColor")),
        }
    }

    pub(crate) fn as_registry_entry(&self) -> CommandResult<&Identifier> {
        match self {
            Value::RegistryEntry { id, .. } => Ok(id),
            _ => Err(self.type_error("RegistryEntry")),
        }
    }
}

/// Parsed argument values for one invocation, keyed by the argument name
/// declared on the command node.
pub struct ArgumentSet {
    args: FxHashMap<String, Value>,
}

impl ArgumentSet {
    pub(crate) fn empty() -> Self {
        Self {
            args: FxHashMap::default(),
        }
    }

    pub(crate) fn new(args: Vec<(String, Value)>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }

    /// Whether the (possibly optional) argument was supplied.
    pub fn has(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    fn get(&self, name: &str) -> CommandResult<&Value> {
        self.args.get(name).ok_or_else(|| {
            CommandError::internal(format!(
                "argument '{name}' not found (command registration bug)"
            ))
        })
    }

    pub fn get_string(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_string()?.clone())
    }

    pub fn get_greedy(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_greedy()?.clone())
    }

    pub fn get_integer(&self, name: &str) -> CommandResult<i32> {
        self.get(name)?.as_integer()
    }

    pub fn get_integer_or(&self, name: &str, default: i32) -> CommandResult<i32> {
        if self.has(name) {
            self.get_integer(name)
        } else {
            Ok(default)
        }
    }

    pub fn get_float(&self, name: &str) -> CommandResult<f32> {
        self.get(name)?.as_float()
    }

    pub fn get_boolean(&self, name: &str) -> CommandResult<bool> {
        self.get(name)?.as_boolean()
    }

    pub fn get_angle(&self, name: &str) -> CommandResult<Angle> {
        self.get(name)?.as_angle()
    }

    pub fn get_time(&self, name: &str) -> CommandResult<GameTime> {
        self.get(name)?.as_time()
    }

    pub fn get_int_range(&self, name: &str) -> CommandResult<IntRange> {
        self.get(name)?.as_int_range()
    }

    pub fn get_identifier(&self, name: &str) -> CommandResult<Identifier> {
        Ok(self.get(name)?.as_identifier()?.clone())
    }

    pub fn get_named_color(&self, name: &str) -> CommandResult<ColorCode> {
        self.get(name)?.as_named_color()
    }

    pub fn get_registry_entry(&self, name: &str) -> CommandResult<Identifier> {
        Ok(self.get(name)?.as_registry_entry()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_defaults_namespace() {
        let id = Identifier::parse("stone").unwrap();
        assert_eq!(id, Identifier::new("minecraft", "stone"));
        assert_eq!(id.to_string(), "minecraft:stone");
    }

    #[test]
    fn identifier_rejects_bad_characters() {
        assert!(Identifier::parse("Stone").is_none());
        assert!(Identifier::parse("mod:some item").is_none());
        assert!(Identifier::parse(":stone").is_none());
        assert!(Identifier::parse("mod:").is_none());
        assert!(Identifier::parse("mod:nested/path").is_some());
    }

    #[test]
    fn argument_set_type_mismatch_is_internal() {
        let args = ArgumentSet::new(vec![("count".to_string(), Value::Integer(3))]);
        let err = args.get_string("count").unwrap_err();
        assert!(matches!(err, CommandError::Internal { .. }));
    }

    #[test]
    fn optional_integer_falls_back() {
        let args = ArgumentSet::empty();
        assert_eq!(args.get_integer_or("hugs", 1).unwrap(), 1);
    }
}
