//! Turns command failures into chat messages.
//!
//! Every user-facing error funnels through [`ExceptionTranslator::handle`]
//! exactly once, at the dispatch boundary. Internal and execution errors are
//! additionally logged with the sender's display name, and carry a
//! hover-to-view, click-to-copy stack trace when the sender holds the debug
//! permission node.

use crate::captions::{self, CaptionRegistry, CaptionVariable};
use crate::errors::CommandError;
use crate::source::CommandSource;
use lectern_text::{ClickEvent, ColorCode, HoverEvent, TextComponent, TextComponentBuilder};
use tracing::warn;

/// Permission node controlling the stack-trace affordance on internal
/// error messages.
pub const HOVER_STACKTRACE_NODE: &str = "lectern.hover-stacktrace";

pub struct ExceptionTranslator {
    captions: CaptionRegistry,
    hover_stacktrace_node: String,
}

impl Default for ExceptionTranslator {
    fn default() -> Self {
        Self::new(CaptionRegistry::with_defaults())
    }
}

impl ExceptionTranslator {
    pub fn new(captions: CaptionRegistry) -> ExceptionTranslator {
        ExceptionTranslator {
            captions,
            hover_stacktrace_node: HOVER_STACKTRACE_NODE.to_string(),
        }
    }

    pub fn with_hover_stacktrace_node(mut self, node: impl Into<String>) -> ExceptionTranslator {
        self.hover_stacktrace_node = node.into();
        self
    }

    /// The permission node gating the stack-trace affordance. The caller
    /// checks it against the sender and passes the verdict to [`handle`].
    ///
    /// [`handle`]: ExceptionTranslator::handle
    pub fn hover_stacktrace_node(&self) -> &str {
        &self.hover_stacktrace_node
    }

    pub fn captions(&self) -> &CaptionRegistry {
        &self.captions
    }

    /// Formats `error` and sends it to `source`'s error channel.
    pub fn handle(&self, source: &dyn CommandSource, error: &CommandError, show_stacktrace: bool) {
        let message = match error {
            CommandError::Internal { message, trace } => {
                warn!(
                    "Error occurred while executing command for user {}: {}",
                    source.display_name(),
                    message
                );
                self.stacktraced(
                    self.captions.format(captions::EXCEPTION_UNEXPECTED, &[]),
                    trace,
                    show_stacktrace,
                )
            }
            CommandError::Execution { cause, trace } => {
                warn!(
                    "Error occurred while executing command for user {}: {:#}",
                    source.display_name(),
                    cause
                );
                self.stacktraced(
                    self.captions.format(captions::EXCEPTION_EXECUTION, &[]),
                    trace,
                    show_stacktrace,
                )
            }
            CommandError::ArgumentParse(failure) => {
                let cause = TextComponentBuilder::new(failure.message())
                    .color_code(ColorCode::Gray)
                    .finish();
                self.captions.format(
                    captions::EXCEPTION_INVALID_ARGUMENT,
                    &[CaptionVariable::component("cause", cause)],
                )
            }
            CommandError::UnknownCommand => {
                self.captions.format(captions::EXCEPTION_NO_SUCH_COMMAND, &[])
            }
            CommandError::NoPermission { .. } => {
                self.captions.format(captions::EXCEPTION_NO_PERMISSION, &[])
            }
            CommandError::InvalidSender { expected, actual } => self.captions.format(
                captions::EXCEPTION_INVALID_SENDER,
                &[
                    CaptionVariable::text("actual", *actual),
                    CaptionVariable::text("expected", *expected),
                ],
            ),
            CommandError::InvalidSyntax { usage } => {
                let syntax = TextComponentBuilder::new(usage.as_str())
                    .color_code(ColorCode::Gray)
                    .finish();
                self.captions.format(
                    captions::EXCEPTION_INVALID_SYNTAX,
                    &[CaptionVariable::component("syntax", syntax)],
                )
            }
        };

        source.send_error(message);
    }

    fn stacktraced(
        &self,
        message: TextComponent,
        trace: &str,
        show_stacktrace: bool,
    ) -> TextComponent {
        if !show_stacktrace {
            return message;
        }

        let tooltip = TextComponentBuilder::new(trace)
            .append(TextComponent::from("\n"))
            .append(
                TextComponentBuilder::new("    Click to copy")
                    .color_code(ColorCode::Gray)
                    .italic(true)
                    .finish(),
            )
            .finish();

        let mut message = message;
        message.hover_event = Some(HoverEvent::show_text(tooltip));
        message.click_event = Some(ClickEvent::copy_to_clipboard(trace));
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseFailure;
    use std::sync::Mutex;

    struct Recorder {
        errors: Mutex<Vec<TextComponent>>,
    }

    impl Recorder {
        fn new() -> Recorder {
            Recorder {
                errors: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> TextComponent {
            self.errors.lock().unwrap().last().unwrap().clone()
        }
    }

    impl CommandSource for Recorder {
        fn display_name(&self) -> String {
            "tester".to_string()
        }

        fn permission_level(&self) -> u8 {
            0
        }

        fn is_player(&self) -> bool {
            true
        }

        fn send_message(&self, _message: TextComponent) {}

        fn send_error(&self, message: TextComponent) {
            self.errors.lock().unwrap().push(message);
        }
    }

    #[test]
    fn every_error_kind_gets_a_distinct_message() {
        let translator = ExceptionTranslator::default();
        let recorder = Recorder::new();

        let errors = [
            CommandError::internal("boom"),
            CommandError::execution(anyhow::anyhow!("handler fell over")),
            CommandError::ArgumentParse(ParseFailure::syntax("expected an integer")),
            CommandError::UnknownCommand,
            CommandError::NoPermission {
                node: "lectern.give".to_string(),
            },
            CommandError::InvalidSender {
                expected: "player",
                actual: "console",
            },
            CommandError::InvalidSyntax {
                usage: "/toast hugs <count>".to_string(),
            },
        ];

        let mut seen = Vec::new();
        for error in &errors {
            translator.handle(&recorder, error, false);
            let text = recorder.last().to_plain();
            assert!(!text.is_empty());
            assert!(!seen.contains(&text), "duplicate message: {text}");
            seen.push(text);
        }
    }

    #[test]
    fn stacktrace_affordance_is_permission_gated() {
        let translator = ExceptionTranslator::default();
        let recorder = Recorder::new();
        let error = CommandError::internal("boom");

        translator.handle(&recorder, &error, false);
        let without = recorder.last();
        assert!(without.hover_event.is_none());
        assert!(without.click_event.is_none());

        translator.handle(&recorder, &error, true);
        let with = recorder.last();
        assert!(with.hover_event.is_some());
        assert!(matches!(
            with.click_event.as_ref().unwrap().action,
            lectern_text::ClickAction::CopyToClipboard
        ));
    }

    #[test]
    fn syntax_errors_carry_the_usage_string() {
        let translator = ExceptionTranslator::default();
        let recorder = Recorder::new();
        translator.handle(
            &recorder,
            &CommandError::InvalidSyntax {
                usage: "/toast hugs <count>".to_string(),
            },
            false,
        );
        assert!(recorder
            .last()
            .to_plain()
            .contains("/toast hugs <count>"));
    }
}
