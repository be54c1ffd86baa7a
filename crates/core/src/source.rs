use lectern_text::TextComponent;
use std::sync::Arc;

/// Capability surface of a platform-native command source. One value exists
/// per invocation and carries everything the bridge needs from the host:
/// identity for logging, permission level for fallback checks, and the two
/// message channels.
pub trait CommandSource: Send + Sync {
    fn display_name(&self) -> String;

    /// Operator-style permission level, compared against the configured
    /// operator level when no explicit permission node matches.
    fn permission_level(&self) -> u8;

    fn is_player(&self) -> bool;

    fn send_message(&self, message: TextComponent);

    fn send_error(&self, message: TextComponent);
}

/// Shared handle to a native source for the duration of one invocation.
pub type SourceHandle = Arc<dyn CommandSource>;

/// The host console. Passes every permission check and prints plain text.
pub struct ConsoleSource;

impl CommandSource for ConsoleSource {
    fn display_name(&self) -> String {
        "Console".to_string()
    }

    fn permission_level(&self) -> u8 {
        u8::MAX
    }

    fn is_player(&self) -> bool {
        false
    }

    fn send_message(&self, message: TextComponent) {
        println!("{}", message.to_plain());
    }

    fn send_error(&self, message: TextComponent) {
        eprintln!("{}", message.to_plain());
    }
}
