use super::BuildContext;
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static BOUND: RefCell<Option<Arc<BuildContext>>> = const { RefCell::new(None) };
}

/// Scoped binding of a [`BuildContext`] to the current thread. The context
/// is bound for the duration of one registration pass and restored on drop,
/// including on unwind, so a failed pass cannot leak its context into the
/// next one.
pub struct BuildContextScope {
    previous: Option<Arc<BuildContext>>,
}

impl BuildContextScope {
    pub fn enter(context: Arc<BuildContext>) -> BuildContextScope {
        let previous = BOUND.with(|bound| bound.borrow_mut().replace(context));
        BuildContextScope { previous }
    }

    pub fn current() -> Option<Arc<BuildContext>> {
        BOUND.with(|bound| bound.borrow().clone())
    }

    /// The bound context, or a panic naming the parser that needed it.
    /// Contextual parsers must never resolve outside a registration pass.
    pub(crate) fn expect_current(parser_key: &str) -> Arc<BuildContext> {
        Self::current().unwrap_or_else(|| {
            panic!(
                "contextual parser `{parser_key}` resolved outside a registration pass \
                 (no build context is bound on this thread)"
            )
        })
    }
}

impl Drop for BuildContextScope {
    fn drop(&mut self) {
        BOUND.with(|bound| *bound.borrow_mut() = self.previous.take());
    }
}

/// Runs `f` with `context` bound on the current thread.
pub fn with_build_context<R>(context: Arc<BuildContext>, f: impl FnOnce() -> R) -> R {
    let _scope = BuildContextScope::enter(context);
    f()
}
