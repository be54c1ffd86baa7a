//! Message templates for user-facing command failures.
//!
//! Captions are looked up by key and formatted by substituting `<variable>`
//! placeholders. Variables carry either plain text or a styled component,
//! so a usage string can stay gray inside an otherwise red error line.

use lectern_text::{TextComponent, TextComponentBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

pub const EXCEPTION_UNEXPECTED: &str = "exception.unexpected";
pub const EXCEPTION_EXECUTION: &str = "exception.execution";
pub const EXCEPTION_INVALID_ARGUMENT: &str = "exception.invalid_argument";
pub const EXCEPTION_NO_SUCH_COMMAND: &str = "exception.no_such_command";
pub const EXCEPTION_NO_PERMISSION: &str = "exception.no_permission";
pub const EXCEPTION_INVALID_SENDER: &str = "exception.invalid_sender";
pub const EXCEPTION_INVALID_SYNTAX: &str = "exception.invalid_syntax";

static DEFAULTS: &[(&str, &str)] = &[
    (
        EXCEPTION_UNEXPECTED,
        "An internal error occurred while attempting to perform this command.",
    ),
    (
        EXCEPTION_EXECUTION,
        "An error occurred while executing this command.",
    ),
    (
        EXCEPTION_INVALID_ARGUMENT,
        "Invalid command argument: <cause>",
    ),
    (EXCEPTION_NO_SUCH_COMMAND, "Unknown command."),
    (
        EXCEPTION_NO_PERMISSION,
        "I'm sorry, but you do not have permission to perform this command. \
         Please contact the server administrators if you believe that this is in error.",
    ),
    (
        EXCEPTION_INVALID_SENDER,
        "<actual> is not allowed to execute that command. Must be of type <expected>.",
    ),
    (
        EXCEPTION_INVALID_SYNTAX,
        "Invalid command syntax. Correct command syntax is: <syntax>",
    ),
];

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(\S+?)>").unwrap());

pub enum CaptionVariable {
    Text { key: String, value: String },
    Component { key: String, value: TextComponent },
}

impl CaptionVariable {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> CaptionVariable {
        CaptionVariable::Text {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn component(key: impl Into<String>, value: TextComponent) -> CaptionVariable {
        CaptionVariable::Component {
            key: key.into(),
            value,
        }
    }

    fn key(&self) -> &str {
        match self {
            CaptionVariable::Text { key, .. } => key,
            CaptionVariable::Component { key, .. } => key,
        }
    }
}

/// Caption key → template. Applications override individual keys to
/// localize or reword messages.
pub struct CaptionRegistry {
    captions: FxHashMap<String, String>,
}

impl Default for CaptionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CaptionRegistry {
    pub fn with_defaults() -> CaptionRegistry {
        let captions = DEFAULTS
            .iter()
            .map(|(key, template)| (key.to_string(), template.to_string()))
            .collect();
        CaptionRegistry { captions }
    }

    pub fn register(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.captions.insert(key.into(), template.into());
    }

    /// The template for `key`; falls back to the key itself so a missing
    /// caption is visible rather than silent.
    pub fn template<'a>(&'a self, key: &'a str) -> &'a str {
        self.captions.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Formats the caption for `key`, substituting `<variable>`
    /// placeholders from `variables`. Unknown placeholders are kept as-is.
    pub fn format(&self, key: &str, variables: &[CaptionVariable]) -> TextComponent {
        let template = self.template(key);
        let mut root = TextComponentBuilder::new("");

        let mut last = 0;
        for capture in VARIABLE_PATTERN.captures_iter(template) {
            let whole = capture.get(0).unwrap();
            let name = &capture[1];
            if whole.start() > last {
                root = root.append(TextComponent::from(&template[last..whole.start()]));
            }
            match variables.iter().find(|variable| variable.key() == name) {
                Some(CaptionVariable::Text { value, .. }) => {
                    root = root.append(TextComponent::from(value.as_str()));
                }
                Some(CaptionVariable::Component { value, .. }) => {
                    root = root.append(value.clone());
                }
                None => {
                    root = root.append(TextComponent::from(whole.as_str()));
                }
            }
            last = whole.end();
        }
        if last < template.len() {
            root = root.append(TextComponent::from(&template[last..]));
        }

        root.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_text::ColorCode;

    #[test]
    fn plain_variables_substitute() {
        let captions = CaptionRegistry::with_defaults();
        let component = captions.format(
            EXCEPTION_INVALID_SENDER,
            &[
                CaptionVariable::text("actual", "Console"),
                CaptionVariable::text("expected", "player"),
            ],
        );
        assert_eq!(
            component.to_plain(),
            "Console is not allowed to execute that command. Must be of type player."
        );
    }

    #[test]
    fn component_variables_keep_styling() {
        let captions = CaptionRegistry::with_defaults();
        let syntax = TextComponentBuilder::new("/toast hugs <count>")
            .color_code(ColorCode::Gray)
            .finish();
        let component = captions.format(
            EXCEPTION_INVALID_SYNTAX,
            &[CaptionVariable::component("syntax", syntax)],
        );
        assert_eq!(
            component.to_plain(),
            "Invalid command syntax. Correct command syntax is: /toast hugs <count>"
        );
        let styled = component
            .extra
            .iter()
            .find(|part| part.color.is_some())
            .unwrap();
        assert_eq!(styled.text, "/toast hugs <count>");
    }

    #[test]
    fn unknown_placeholders_stay_visible() {
        let mut captions = CaptionRegistry::with_defaults();
        captions.register("custom", "value is <missing>");
        let component = captions.format("custom", &[]);
        assert_eq!(component.to_plain(), "value is <missing>");
    }

    #[test]
    fn missing_caption_falls_back_to_key() {
        let captions = CaptionRegistry::with_defaults();
        assert_eq!(captions.template("no.such.key"), "no.such.key");
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut captions = CaptionRegistry::with_defaults();
        captions.register(EXCEPTION_NO_SUCH_COMMAND, "Det finns inget sådant kommando.");
        let component = captions.format(EXCEPTION_NO_SUCH_COMMAND, &[]);
        assert_eq!(component.to_plain(), "Det finns inget sådant kommando.");
    }
}
