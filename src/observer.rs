use crate::memory::Memory;

/// Per-step inspection capability offered by the run loop.
///
/// The execution core has zero dependency on presentation: anything that
/// wants to watch the machine (memory dumps, debuggers, test harnesses)
/// implements this trait and is handed a read-only view of memory and the
/// program counter before each step. Observers must not affect control
/// flow; they have no way to mutate the machine.
pub trait Observer {
    /// Called once, before the first step.
    fn init(&mut self, _mem: &Memory) {}

    /// Called before every step with the full memory state and the
    /// current program counter.
    fn observe(&mut self, _mem: &Memory, _pc: usize) {}
}

/// Observer that does nothing, for headless runs.
pub struct NullObserver;

impl Observer for NullObserver {}
