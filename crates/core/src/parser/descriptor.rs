use super::{BuildContext, ValueType};
use crate::args::Value;
use crate::errors::ParseFailure;
use std::sync::Arc;

/// A resolved parse function: consumes a prefix of the input, returning the
/// parsed value and the remaining input.
pub type ParseFn =
    Arc<dyn for<'a> Fn(&'a str) -> Result<(Value, &'a str), ParseFailure> + Send + Sync>;

/// How a parser for some value type is obtained.
///
/// `Constant` descriptors can be resolved at any time. `Contextual`
/// descriptors need the host's [`BuildContext`] and may only be resolved
/// while one is bound for the current registration pass; resolving one
/// without a bound context is a programming error and panics.
pub enum ParserDescriptor {
    Constant(Box<dyn Fn(&ValueType) -> ParseFn + Send + Sync>),
    Contextual(Box<dyn Fn(&ValueType, &BuildContext) -> ParseFn + Send + Sync>),
}

impl ParserDescriptor {
    pub fn constant<F>(factory: F) -> ParserDescriptor
    where
        F: Fn(&ValueType) -> ParseFn + Send + Sync + 'static,
    {
        ParserDescriptor::Constant(Box::new(factory))
    }

    pub fn contextual<F>(factory: F) -> ParserDescriptor
    where
        F: Fn(&ValueType, &BuildContext) -> ParseFn + Send + Sync + 'static,
    {
        ParserDescriptor::Contextual(Box::new(factory))
    }

    pub fn is_contextual(&self) -> bool {
        matches!(self, ParserDescriptor::Contextual(_))
    }
}
