//! The standard parser set: plain tokens, bounded numbers, and the
//! Minecraft-flavored value types (angles, game time, identifiers, registry
//! entries). Registered under the keys produced by [`ValueType::key`].

use super::{ParseFn, ParserDescriptor, ParserRegistry, ValueType};
use crate::args::{Angle, GameTime, Identifier, IntRange, Value};
use crate::errors::ParseFailure;
use lectern_text::ColorCode;
use std::sync::Arc;

type Parsed<'a> = Result<(Value, &'a str), ParseFailure>;

fn consume_token(input: &str) -> Result<(&str, &str), ParseFailure> {
    let input = input.trim_start();
    if input.is_empty() {
        return Err(ParseFailure::syntax("expected another argument"));
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Ok((&input[..end], &input[end..]))
}

pub fn parse_string(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    Ok((Value::String(token.to_string()), rest))
}

pub fn parse_greedy_string(input: &str) -> Parsed<'_> {
    Ok((Value::GreedyString(input.trim_start().to_string()), ""))
}

pub fn parse_integer(input: &str, min: i32, max: i32) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let value = token
        .parse::<i32>()
        .map_err(|_| ParseFailure::syntax(format!("expected an integer, found `{token}`")))?;
    if !(min..=max).contains(&value) {
        return Err(ParseFailure::parser(format!(
            "integer must be between {min} and {max}, found {value}"
        )));
    }
    Ok((Value::Integer(value), rest))
}

pub fn parse_float(input: &str, min: f32, max: f32) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let value = token
        .parse::<f32>()
        .map_err(|_| ParseFailure::syntax(format!("expected a number, found `{token}`")))?;
    if !value.is_finite() {
        return Err(ParseFailure::parser(format!("`{token}` is not finite")));
    }
    if !(min..=max).contains(&value) {
        return Err(ParseFailure::parser(format!(
            "number must be between {min} and {max}, found {value}"
        )));
    }
    Ok((Value::Float(value), rest))
}

pub fn parse_boolean(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let value = match token.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => true,
        "false" | "no" | "0" | "off" => false,
        _ => {
            return Err(ParseFailure::syntax(format!(
                "expected true or false, found `{token}`"
            )))
        }
    };
    Ok((Value::Boolean(value), rest))
}

pub fn parse_angle(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let (relative, number) = match token.strip_prefix('~') {
        Some("") => (true, "0"),
        Some(number) => (true, number),
        None => (false, token),
    };
    let degrees = number
        .parse::<f32>()
        .map_err(|_| ParseFailure::syntax(format!("expected an angle, found `{token}`")))?;
    if !degrees.is_finite() {
        return Err(ParseFailure::parser(format!("`{token}` is not finite")));
    }
    // wrap into [-180, 180)
    let degrees = ((degrees % 360.0) + 540.0) % 360.0 - 180.0;
    Ok((Value::Angle(Angle { degrees, relative }), rest))
}

pub fn parse_time(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let (number, factor) = match token.char_indices().last() {
        Some((i, 't')) => (&token[..i], 1),
        Some((i, 's')) => (&token[..i], GameTime::TICKS_PER_SECOND),
        Some((i, 'd')) => (&token[..i], GameTime::TICKS_PER_DAY),
        _ => (token, 1),
    };
    let count = number
        .parse::<i64>()
        .map_err(|_| ParseFailure::syntax(format!("expected a duration, found `{token}`")))?;
    if count < 0 {
        return Err(ParseFailure::parser("durations can not be negative"));
    }
    Ok((
        Value::Time(GameTime {
            ticks: count * factor,
        }),
        rest,
    ))
}

pub fn parse_int_range(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let range = match token.split_once("..") {
        Some((min, max)) => {
            let min = min.parse::<i32>().map_err(|_| range_syntax_error(token))?;
            let max = max.parse::<i32>().map_err(|_| range_syntax_error(token))?;
            if min > max {
                return Err(ParseFailure::parser(format!(
                    "range minimum {min} is larger than maximum {max}"
                )));
            }
            IntRange { min, max }
        }
        None => {
            let exact = token.parse::<i32>().map_err(|_| range_syntax_error(token))?;
            IntRange {
                min: exact,
                max: exact,
            }
        }
    };
    Ok((Value::IntRange(range), rest))
}

fn range_syntax_error(token: &str) -> ParseFailure {
    ParseFailure::syntax(format!("expected a range like `0..5`, found `{token}`"))
}

pub fn parse_identifier(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let id = Identifier::parse(token).ok_or_else(|| {
        ParseFailure::syntax(format!("`{token}` is not a valid identifier"))
    })?;
    Ok((Value::Identifier(id), rest))
}

pub fn parse_named_color(input: &str) -> Parsed<'_> {
    let (token, rest) = consume_token(input)?;
    let color = ColorCode::from_name(&token.to_lowercase())
        .ok_or_else(|| ParseFailure::parser(format!("`{token}` is not a chat color")))?;
    Ok((Value::NamedColor(color), rest))
}

pub(crate) fn register_defaults(registry: &mut ParserRegistry) {
    registry.register(
        "string",
        ParserDescriptor::constant(|_| Arc::new(parse_string)),
    );
    registry.register(
        "greedy_string",
        ParserDescriptor::constant(|_| Arc::new(parse_greedy_string)),
    );
    registry.register(
        "integer",
        ParserDescriptor::constant(|value_type| {
            let (min, max) = match value_type {
                ValueType::Integer { min, max } => (*min, *max),
                _ => (i32::MIN, i32::MAX),
            };
            Arc::new(move |input: &str| parse_integer(input, min, max))
        }),
    );
    registry.register(
        "float",
        ParserDescriptor::constant(|value_type| {
            let (min, max) = match value_type {
                ValueType::Float { min, max } => (*min, *max),
                _ => (f32::MIN, f32::MAX),
            };
            Arc::new(move |input: &str| parse_float(input, min, max))
        }),
    );
    registry.register(
        "boolean",
        ParserDescriptor::constant(|_| Arc::new(parse_boolean)),
    );
    registry.register(
        "angle",
        ParserDescriptor::constant(|_| Arc::new(parse_angle)),
    );
    registry.register("time", ParserDescriptor::constant(|_| Arc::new(parse_time)));
    registry.register(
        "int_range",
        ParserDescriptor::constant(|_| Arc::new(parse_int_range)),
    );
    registry.register(
        "identifier",
        ParserDescriptor::constant(|_| Arc::new(parse_identifier)),
    );
    registry.register(
        "named_color",
        ParserDescriptor::constant(|_| Arc::new(parse_named_color)),
    );
    registry.register(
        "registry_entry",
        ParserDescriptor::contextual(|value_type, context| {
            let registry_name = match value_type {
                ValueType::RegistryEntry { registry } => registry.clone(),
                _ => unreachable!("registry_entry descriptor used for {value_type:?}"),
            };
            let entries = context.registry(&registry_name).unwrap_or_else(|| {
                panic!("registry `{registry_name}` missing from the build context")
            });
            registry_entry_parser(registry_name, entries)
        }),
    );
}

fn registry_entry_parser(
    registry: String,
    entries: Arc<rustc_hash::FxHashSet<String>>,
) -> ParseFn {
    Arc::new(move |input: &str| {
        let (token, rest) = consume_token(input)?;
        let id = Identifier::parse(token).ok_or_else(|| {
            ParseFailure::syntax(format!("`{token}` is not a valid identifier"))
        })?;
        if !entries.contains(&id.to_string()) {
            return Err(ParseFailure::parser(format!(
                "no such entry `{id}` in registry `{registry}`"
            )));
        }
        Ok((
            Value::RegistryEntry {
                registry: registry.clone(),
                id,
            },
            rest,
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{with_build_context, BuildContext};

    #[test]
    fn integer_bounds_are_parser_errors() {
        assert!(matches!(
            parse_integer("900", 0, 64).unwrap_err(),
            ParseFailure::Parser { .. }
        ));
        assert!(matches!(
            parse_integer("many", 0, 64).unwrap_err(),
            ParseFailure::Syntax { .. }
        ));
        let (value, rest) = parse_integer(" 12 next", 0, 64).unwrap();
        assert_eq!(value, Value::Integer(12));
        assert_eq!(rest, " next");
    }

    #[test]
    fn angle_normalizes_and_handles_relative() {
        let (value, _) = parse_angle("270").unwrap();
        assert_eq!(
            value,
            Value::Angle(Angle {
                degrees: -90.0,
                relative: false
            })
        );
        let (value, _) = parse_angle("~").unwrap();
        assert_eq!(
            value,
            Value::Angle(Angle {
                degrees: 0.0,
                relative: true
            })
        );
    }

    #[test]
    fn time_suffixes_scale_to_ticks() {
        let (value, _) = parse_time("5s").unwrap();
        assert_eq!(value, Value::Time(GameTime { ticks: 100 }));
        let (value, _) = parse_time("2d").unwrap();
        assert_eq!(value, Value::Time(GameTime { ticks: 48000 }));
        let (value, _) = parse_time("15").unwrap();
        assert_eq!(value, Value::Time(GameTime { ticks: 15 }));
        assert!(parse_time("-1t").is_err());
    }

    #[test]
    fn int_range_accepts_exact_and_span() {
        let (value, _) = parse_int_range("0..5").unwrap();
        assert_eq!(value, Value::IntRange(IntRange { min: 0, max: 5 }));
        let (value, _) = parse_int_range("7").unwrap();
        assert_eq!(value, Value::IntRange(IntRange { min: 7, max: 7 }));
        assert!(parse_int_range("5..0").is_err());
    }

    #[test]
    fn named_color_rejects_formatting_codes() {
        let (value, _) = parse_named_color("gold").unwrap();
        assert_eq!(value, Value::NamedColor(ColorCode::Gold));
        assert!(parse_named_color("bold").is_err());
    }

    #[test]
    fn registry_entry_checks_the_snapshot() {
        let registry = ParserRegistry::with_defaults();
        let context = Arc::new(BuildContext::new().with_registry("item", ["stone", "mod:gadget"]));
        let parse = with_build_context(context, || {
            registry
                .resolve(&ValueType::registry_entry("item"))
                .unwrap()
        });

        let (value, _) = (*parse)("minecraft:stone").unwrap();
        assert!(matches!(value, Value::RegistryEntry { .. }));
        let (value, _) = (*parse)("mod:gadget").unwrap();
        assert!(matches!(value, Value::RegistryEntry { .. }));

        let err = (*parse)("dirt").unwrap_err();
        assert!(matches!(err, ParseFailure::Parser { .. }));
        assert!(err.message().contains("minecraft:dirt"));
    }

    #[test]
    fn resolved_registry_parser_outlives_the_scope() {
        // Resolution happens once per pass; the parse function must keep
        // working after the context is unbound.
        let registry = ParserRegistry::with_defaults();
        let context = Arc::new(BuildContext::new().with_registry("item", ["stone"]));
        let parse = with_build_context(context, || {
            registry
                .resolve(&ValueType::registry_entry("item"))
                .unwrap()
        });
        assert!((*parse)("stone").is_ok());
    }
}
