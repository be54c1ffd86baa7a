use lectern_core::{
    CommandManager, CommandNode, CommandSource, SenderMapper, ServerRuntime, SourceHandle,
    ValueType,
};
use lectern_text::TextComponent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A fake player that records everything sent to it.
pub struct MockPlayer {
    name: String,
    level: u8,
    messages: Mutex<Vec<TextComponent>>,
    errors: Mutex<Vec<TextComponent>>,
}

impl MockPlayer {
    pub fn new(name: &str, level: u8) -> Arc<MockPlayer> {
        Arc::new(MockPlayer {
            name: name.to_string(),
            level,
            messages: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<TextComponent> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<TextComponent> {
        self.errors.lock().unwrap().clone()
    }

    pub fn last_error(&self) -> TextComponent {
        self.errors
            .lock()
            .unwrap()
            .last()
            .expect("no error message was sent")
            .clone()
    }
}

impl CommandSource for MockPlayer {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn permission_level(&self) -> u8 {
        self.level
    }

    fn is_player(&self) -> bool {
        true
    }

    fn send_message(&self, message: TextComponent) {
        self.messages.lock().unwrap().push(message);
    }

    fn send_error(&self, message: TextComponent) {
        self.errors.lock().unwrap().push(message);
    }
}

pub fn source(player: &Arc<MockPlayer>) -> SourceHandle {
    player.clone()
}

/// Application sender distinct from the native source, so the full
/// map/reverse round trip runs on every invocation.
pub struct TestSender {
    pub source: SourceHandle,
}

pub struct TestSenderMapper;

impl SenderMapper<TestSender> for TestSenderMapper {
    fn map(&self, source: SourceHandle) -> TestSender {
        TestSender { source }
    }

    fn reverse(&self, sender: &TestSender) -> SourceHandle {
        sender.source.clone()
    }
}

pub struct Harness {
    pub runtime: Arc<ServerRuntime>,
    pub manager: Arc<CommandManager<TestSender>>,
    /// Number of times the `/toast give` handler actually ran.
    pub gives: Arc<AtomicUsize>,
}

/// A runtime with the demo command set registered but not yet started.
pub fn harness() -> Harness {
    let runtime = ServerRuntime::new(Default::default());
    runtime.permissions().declare_node("toast.give");

    let manager: Arc<CommandManager<TestSender>> =
        CommandManager::server(&runtime, Arc::new(TestSenderMapper)).expect("gate is still open");

    let gives = Arc::new(AtomicUsize::new(0));
    let give_counter = gives.clone();

    manager
        .register(
            CommandNode::literal("toast")
                .then(
                    CommandNode::literal("hugs").then(
                        CommandNode::argument("count", ValueType::integer_in(1, 64)).executes(
                            |ctx| {
                                let count = ctx.args().get_integer("count")?;
                                ctx.reply(format!("{} hugs incoming", count));
                                Ok(())
                            },
                        ),
                    ),
                )
                .then(
                    CommandNode::literal("give")
                        .require_permission("toast.give")
                        .then(
                            CommandNode::argument("item", ValueType::registry_entry("item")).then(
                                CommandNode::argument("amount", ValueType::integer_in(1, 64))
                                    .executes(move |ctx| {
                                        give_counter.fetch_add(1, Ordering::SeqCst);
                                        let item = ctx.args().get_registry_entry("item")?;
                                        let amount = ctx.args().get_integer("amount")?;
                                        ctx.reply(format!("gave {amount} x {item}"));
                                        Ok(())
                                    }),
                            ),
                        ),
                )
                .then(CommandNode::literal("crash").executes(|_ctx| {
                    Err(lectern_core::CommandError::execution(anyhow::anyhow!(
                        "deliberately broken handler"
                    )))
                }))
                .then(CommandNode::literal("me").player_only().executes(|ctx| {
                    ctx.reply("you are a player");
                    Ok(())
                })),
        )
        .expect("demo command tree is well-formed");

    Harness {
        runtime,
        manager,
        gives,
    }
}

pub fn item_registry() -> lectern_core::BuildContext {
    lectern_core::BuildContext::new().with_registry("item", ["stone", "redstone", "lever"])
}
