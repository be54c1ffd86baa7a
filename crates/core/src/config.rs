use crate::permissions::PermissionEngine;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use toml_edit::{value, DocumentMut};

pub static CONFIG: Lazy<BridgeConfig> = Lazy::new(|| BridgeConfig::load("Lectern.toml"));

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, bool);

impl<T> ConfigSerializeDefault for Option<T> {
    fn fix_config(self, _: &str, _: &mut DocumentMut) {
        assert!(matches!(self, None), "`Some` as default is unimplemented");
    }
}

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Serialize, Deserialize)]
        pub struct BridgeConfig {
            $(
                pub $name: $type,
            )*
        }

        impl BridgeConfig {
            fn load(config_file: &str) -> BridgeConfig {
                let str = fs::read_to_string(config_file).unwrap_or_default();
                let mut doc = str.parse::<DocumentMut>().unwrap();

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    let mut file = fs::OpenOptions::new().create(true).write(true).open(&config_file).unwrap();
                    write!(file, "{}", patched).unwrap();
                }

                toml::from_str(&patched).unwrap()
            }
        }
    };
}

gen_config! {
    op_permission_level: i64 = 4,
    command_aliases: Option<Vec<CommandAlias>> = None,
    permissions: Option<PermissionsConfig> = None
}

#[derive(Serialize, Deserialize, Clone)]
pub struct CommandAlias {
    pub alias: String,
    pub replacement: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct PermissionsConfig {
    /// Nodes known to the host. Every node referenced by a registered
    /// command must appear here or be covered by a group grant.
    #[serde(default)]
    pub declared_nodes: Vec<String>,
    #[serde(default)]
    pub groups: Vec<PermissionGroup>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct PermissionGroup {
    pub name: String,
    pub members: Vec<String>,
    /// Node patterns, wildcard segments allowed. A leading `-` denies the
    /// pattern instead of granting it.
    pub nodes: Vec<String>,
}

impl PermissionsConfig {
    /// Loads declared nodes and group grants into the engine.
    pub fn apply(&self, engine: &PermissionEngine) {
        for node in &self.declared_nodes {
            engine.declare_node(node);
        }
        for group in &self.groups {
            for member in &group.members {
                for node in &group.nodes {
                    match node.strip_prefix('-') {
                        Some(denied) => engine.grant(member, denied, false),
                        None => engine.grant(member, node, true),
                    }
                }
            }
        }
    }
}
