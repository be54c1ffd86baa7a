use crate::args::ArgumentSet;
use crate::source::SourceHandle;
use lectern_text::{TextComponent, TextComponentBuilder};

/// Everything a command handler gets to see: the mapped sender, the parsed
/// arguments, and reply channels that route through the native source
/// resolved back from the sender.
pub struct CommandContext<'a, C> {
    sender: C,
    native: SourceHandle,
    args: &'a ArgumentSet,
}

impl<'a, C> CommandContext<'a, C> {
    pub(crate) fn new(sender: C, native: SourceHandle, args: &'a ArgumentSet) -> Self {
        Self {
            sender,
            native,
            args,
        }
    }

    pub fn sender(&self) -> &C {
        &self.sender
    }

    pub fn args(&self) -> &ArgumentSet {
        self.args
    }

    pub fn reply(&self, message: impl Into<TextComponent>) {
        self.native.send_message(message.into());
    }

    /// Sends a message written with `&`-style legacy formatting codes.
    pub fn reply_legacy(&self, message: &str) {
        self.native.send_message(legacy_component(message));
    }

    pub fn error(&self, message: impl Into<TextComponent>) {
        self.native.send_error(message.into());
    }
}

/// One component from `&`-formatted legacy text.
pub(crate) fn legacy_component(message: &str) -> TextComponent {
    let mut root = TextComponentBuilder::new("");
    for part in TextComponent::from_legacy_text(message) {
        root = root.append(part);
    }
    root.finish()
}
