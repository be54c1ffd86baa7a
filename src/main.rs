use clap::Parser;
use lectern_core::config::CONFIG;
use lectern_core::parser::BuildContext;
use lectern_core::{
    CommandContext, CommandManager, CommandNode, ConsoleSource, RuntimeSettings, SenderMapper,
    ServerRuntime, SourceHandle, ValueType,
};
use lectern_text::{ColorCode, TextComponentBuilder};
use std::io::BufRead;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// The application-side sender identity. Deliberately not the native source
/// itself, so the demo exercises the sender mapper both ways.
struct AppSender {
    source: SourceHandle,
}

impl AppSender {
    fn name(&self) -> String {
        self.source.display_name()
    }
}

struct AppSenderMapper;

impl SenderMapper<AppSender> for AppSenderMapper {
    fn map(&self, source: SourceHandle) -> AppSender {
        AppSender { source }
    }

    fn reverse(&self, sender: &AppSender) -> SourceHandle {
        sender.source.clone()
    }
}

#[derive(Parser)]
#[command(about, version)]
struct Args {
    /// Run a single command line and exit instead of reading from stdin.
    #[arg(short, long)]
    execute: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "lectern.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("LECTERN_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let runtime = ServerRuntime::new(RuntimeSettings {
        op_permission_level: CONFIG.op_permission_level as u8,
        ..Default::default()
    });

    if let Some(permissions) = &CONFIG.permissions {
        permissions.apply(runtime.permissions());
    }
    runtime.permissions().declare_node("lectern.give");

    if let Some(aliases) = &CONFIG.command_aliases {
        for alias in aliases {
            runtime.add_command_alias(alias.alias.trim(), alias.replacement.trim());
        }
    }

    let manager: Arc<CommandManager<AppSender>> =
        CommandManager::server(&runtime, Arc::new(AppSenderMapper))
            .expect("manager constructed before the server starts");
    register_demo_commands(&manager);

    // The "server starting" event: gate closes, parsers resolve against the
    // registry snapshot, trees are lowered.
    runtime
        .start(
            BuildContext::new()
                .with_registry("item", ["stone", "redstone", "repeater", "comparator", "lever"]),
        )
        .expect("command registration failed");

    let console: SourceHandle = Arc::new(ConsoleSource);

    if let Some(line) = args.execute {
        let _ = runtime.execute(&console, &line);
        return;
    }

    println!("lectern demo console, try `lectern hugs` or `lectern give stone 3` (ctrl-d quits)");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        let _ = runtime.execute(&console, &line);
    }
}

fn register_demo_commands(manager: &CommandManager<AppSender>) {
    manager
        .register(
            CommandNode::literal("lectern")
                .then(
                    CommandNode::literal("hugs").executes(|ctx: &mut CommandContext<'_, AppSender>| {
                        ctx.reply(format!("Hello, {}! Have a hug.", ctx.sender().name()));
                        Ok(())
                    }).then(
                        CommandNode::argument("count", ValueType::integer_in(1, 64)).executes(
                            |ctx: &mut CommandContext<'_, AppSender>| {
                                let count = ctx.args().get_integer("count")?;
                                ctx.reply(format!(
                                    "Hello, {}! Have {} hugs.",
                                    ctx.sender().name(),
                                    count
                                ));
                                Ok(())
                            },
                        ),
                    ),
                )
                .then(
                    CommandNode::literal("give")
                        .require_permission("lectern.give")
                        .then(
                            CommandNode::argument("item", ValueType::registry_entry("item")).then(
                                CommandNode::argument("amount", ValueType::integer_in(1, 64))
                                    .executes(|ctx| {
                                        let item = ctx.args().get_registry_entry("item")?;
                                        let amount = ctx.args().get_integer("amount")?;
                                        ctx.reply(
                                            TextComponentBuilder::new("You have been given ")
                                                .append(
                                                    TextComponentBuilder::new(format!(
                                                        "{amount} x {item}"
                                                    ))
                                                    .color_code(ColorCode::Green)
                                                    .finish(),
                                                )
                                                .finish(),
                                        );
                                        Ok(())
                                    }),
                            ),
                        ),
                )
                .then(
                    CommandNode::literal("color").then(
                        CommandNode::argument("color", ValueType::NamedColor).executes(|ctx| {
                            let color = ctx.args().get_named_color("color")?;
                            ctx.reply(
                                TextComponentBuilder::new("Like this?")
                                    .color_code(color)
                                    .finish(),
                            );
                            Ok(())
                        }),
                    ),
                )
                .then(
                    CommandNode::literal("echo").then(
                        CommandNode::argument("message", ValueType::GreedyString).executes(|ctx| {
                            ctx.reply_legacy(&ctx.args().get_greedy("message")?);
                            Ok(())
                        }),
                    ),
                )
                .then(CommandNode::literal("crash").executes(|_ctx| {
                    Err(lectern_core::CommandError::execution(anyhow::anyhow!(
                        "the demo crash command crashed, as requested"
                    )))
                })),
        )
        .expect("demo commands are well-formed");
}
