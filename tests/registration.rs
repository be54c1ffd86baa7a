mod common;
use common::*;

use lectern_core::parser::ParserDescriptor;
use lectern_core::{CommandManager, CommandNode, SetupError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn server_managers_fail_fast_after_the_gate_closes() {
    let harness = harness();
    harness.runtime.start(item_registry()).unwrap();

    // Every attempt fails, no matter how many constructions succeeded
    // before the gate closed.
    for _ in 0..3 {
        let result = CommandManager::<TestSender>::server(&harness.runtime, Arc::new(TestSenderMapper));
        assert!(matches!(result, Err(SetupError::LateRegistration)));
    }
}

#[test]
fn late_registration_on_a_live_server_manager_is_rejected() {
    let harness = harness();
    harness.runtime.start(item_registry()).unwrap();

    let result = harness
        .manager
        .register(CommandNode::literal("latecomer").executes(|_| Ok(())));
    assert!(matches!(result, Err(SetupError::LateRegistration)));

    let player = MockPlayer::new("visitor", 0);
    let result = harness.runtime.execute(&source(&player), "latecomer");
    assert!(result.is_err());
}

#[test]
fn the_runtime_starts_exactly_once() {
    let harness = harness();
    harness.runtime.start(item_registry()).unwrap();
    assert!(matches!(
        harness.runtime.start(item_registry()),
        Err(SetupError::AlreadyStarted)
    ));
}

#[test]
fn client_managers_may_attach_after_start() {
    let harness = harness();
    harness.runtime.start(item_registry()).unwrap();

    let client = CommandManager::<TestSender>::client(&harness.runtime, Arc::new(TestSenderMapper));
    client
        .register(CommandNode::literal("cheer").executes(|ctx| {
            ctx.reply("hooray");
            Ok(())
        }))
        .unwrap();

    let player = MockPlayer::new("visitor", 0);
    harness.runtime.execute(&source(&player), "cheer").unwrap();
    assert_eq!(player.messages()[0].to_plain(), "hooray");
}

#[test]
fn undeclared_permission_nodes_fail_the_registration_pass() {
    let harness = harness();
    harness
        .manager
        .register(
            CommandNode::literal("secret")
                .require_permission("toast.secret")
                .executes(|_| Ok(())),
        )
        .unwrap();

    let result = harness.runtime.start(item_registry());
    match result {
        Err(SetupError::UnregisteredPermissionNode { node, command }) => {
            assert_eq!(node, "toast.secret");
            assert_eq!(command, "secret");
        }
        other => panic!("expected an unregistered-node error, got {other:?}"),
    }
}

#[test]
fn contextual_parsers_resolve_once_per_pass() {
    let harness = harness();

    let resolutions = Arc::new(AtomicUsize::new(0));
    let seen = resolutions.clone();
    harness.manager.register_parser(
        "registry_entry",
        ParserDescriptor::contextual(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Arc::new(|input: &str| {
                lectern_core::parser::standard::parse_identifier(input).map(|(value, rest)| {
                    match value {
                        lectern_core::Value::Identifier(id) => (
                            lectern_core::Value::RegistryEntry {
                                registry: "item".to_string(),
                                id,
                            },
                            rest,
                        ),
                        _ => unreachable!(),
                    }
                })
            })
        }),
    );

    harness.runtime.start(item_registry()).unwrap();
    // One registry_entry argument in the tree, resolved during the pass.
    assert_eq!(resolutions.load(Ordering::SeqCst), 1);

    harness
        .runtime
        .permissions()
        .grant("builder", "toast.give", true);
    let player = MockPlayer::new("builder", 0);
    for _ in 0..5 {
        harness
            .runtime
            .execute(&source(&player), "toast give stone 1")
            .unwrap();
    }
    // Invocations reuse the resolved parser.
    assert_eq!(resolutions.load(Ordering::SeqCst), 1);
}
