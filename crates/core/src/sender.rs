use crate::source::SourceHandle;

/// Bidirectional conversion between the application's sender type and the
/// native command source. `reverse(map(x))` does not have to return the same
/// allocation as `x`, but it must resolve to a source with equivalent
/// permission and messaging behavior for the lifetime of the invocation.
pub trait SenderMapper<C>: Send + Sync {
    fn map(&self, source: SourceHandle) -> C;

    fn reverse(&self, sender: &C) -> SourceHandle;
}

/// Mapper for applications that use the native source directly as their
/// sender type.
pub struct NativeSenderMapper;

impl SenderMapper<SourceHandle> for NativeSenderMapper {
    fn map(&self, source: SourceHandle) -> SourceHandle {
        source
    }

    fn reverse(&self, sender: &SourceHandle) -> SourceHandle {
        sender.clone()
    }
}
