//! Permission bridging: wildcard node grants with an operator-level
//! fallback, served through a small bounded cache.

use crate::source::CommandSource;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Mutex;

const CACHE_CAPACITY: usize = 1024;

#[derive(Debug)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug)]
struct PermissionPattern {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionPattern {
    fn parse(pattern: &str, value: bool) -> PermissionPattern {
        let path = pattern
            .split('.')
            .map(|segment| match segment {
                "*" => PathSegment::WildCard,
                segment => PathSegment::Named(segment.to_owned()),
            })
            .collect();
        PermissionPattern { path, value }
    }

    fn matches(&self, node: &str) -> bool {
        let mut segments = node.split('.');
        for part in &self.path {
            match part {
                PathSegment::WildCard => return true,
                PathSegment::Named(name) => match segments.next() {
                    Some(segment) if segment == name => {}
                    _ => return false,
                },
            }
        }
        segments.next().is_none()
    }
}

/// Permission verdicts for command sources.
///
/// Explicit grants are consulted first, first match wins; without a match
/// the verdict falls back to comparing the source's operator level against
/// the configured one. The console bypasses all checks.
pub struct PermissionEngine {
    op_permission_level: u8,
    declared: Mutex<FxHashSet<String>>,
    grants: Mutex<FxHashMap<String, Vec<PermissionPattern>>>,
    cache: Mutex<IndexMap<(String, String), bool>>,
}

impl PermissionEngine {
    pub fn new(op_permission_level: u8) -> PermissionEngine {
        PermissionEngine {
            op_permission_level,
            declared: Mutex::new(FxHashSet::default()),
            grants: Mutex::new(FxHashMap::default()),
            cache: Mutex::new(IndexMap::new()),
        }
    }

    /// Marks a node as known to the host configuration. The registration
    /// scan rejects command trees referencing undeclared nodes.
    pub fn declare_node(&self, node: impl Into<String>) {
        self.declared.lock().unwrap().insert(node.into());
    }

    pub fn is_declared(&self, node: &str) -> bool {
        if self.declared.lock().unwrap().contains(node) {
            return true;
        }
        self.grants
            .lock()
            .unwrap()
            .values()
            .flatten()
            .any(|pattern| pattern.matches(node))
    }

    /// Grants (or denies, with `value == false`) a node pattern to a
    /// subject. Patterns may end in a `*` wildcard segment.
    pub fn grant(&self, subject: impl Into<String>, pattern: &str, value: bool) {
        self.grants
            .lock()
            .unwrap()
            .entry(subject.into())
            .or_default()
            .push(PermissionPattern::parse(pattern, value));
        // Verdicts may have changed under the cache.
        self.cache.lock().unwrap().clear();
    }

    pub fn check(&self, source: &dyn CommandSource, node: &str) -> bool {
        if node.is_empty() {
            return true;
        }
        if !source.is_player() {
            return true;
        }

        let subject = source.display_name();
        let cache_key = (subject.clone(), node.to_string());
        if let Some(&verdict) = self.cache.lock().unwrap().get(&cache_key) {
            return verdict;
        }

        let verdict = self
            .explicit_verdict(&subject, node)
            .unwrap_or_else(|| source.permission_level() >= self.op_permission_level);

        let mut cache = self.cache.lock().unwrap();
        if cache.len() >= CACHE_CAPACITY {
            cache.shift_remove_index(0);
        }
        cache.insert(cache_key, verdict);

        verdict
    }

    fn explicit_verdict(&self, subject: &str, node: &str) -> Option<bool> {
        let grants = self.grants.lock().unwrap();
        let patterns = grants.get(subject)?;
        patterns
            .iter()
            .find(|pattern| pattern.matches(node))
            .map(|pattern| pattern.value)
    }
}
