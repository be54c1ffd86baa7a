use std::sync::atomic::{AtomicBool, Ordering};

/// One-way latch tied to the server-starting lifecycle event.
///
/// While open, server command managers may be constructed and commands
/// registered. The gate closes exactly once, when the host begins starting;
/// construction attempts after that point fail loudly instead of silently
/// registering into a dispatch tree that has already been built.
pub struct RegistrationGate {
    closed: AtomicBool,
}

impl Default for RegistrationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationGate {
    pub fn new() -> RegistrationGate {
        RegistrationGate {
            closed: AtomicBool::new(false),
        }
    }

    /// Closes the gate. Returns whether this call performed the transition.
    pub(crate) fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closes_exactly_once() {
        let gate = RegistrationGate::new();
        assert!(!gate.is_closed());
        assert!(gate.close());
        assert!(gate.is_closed());
        assert!(!gate.close());
        assert!(gate.is_closed());
    }
}
