//! # Session
//!
//! Glue between a live debug session and the unwinder.
//!
//! A [`DebugTarget`] is whatever owns the traced process: it knows the
//! current thread, can capture that thread's registers, and exposes the
//! process memory and region map. [`backtrace`] runs the whole pipeline
//! against it and collapses every failure into an empty [`CallStack`].

use tracing::debug;

use crate::classify::CallClassifier;
use crate::error::{CoreError, CoreResult};
use crate::memory::{MemoryAccess, MemorySnapshot, RegionLookup};
use crate::registers::RegisterFile;
use crate::types::{Architecture, ThreadId};
use crate::unwind::{CallStack, StackUnwinder, UnwindConfig};

/// The debug session state the core consumes
pub trait DebugTarget
{
    /// Memory and region view of the traced process.
    type Memory: MemoryAccess + RegionLookup + ?Sized;

    /// Architecture of the traced process.
    fn architecture(&self) -> Architecture;

    /// Thread to inspect, or `None` if no process or thread is attached.
    fn current_thread(&self) -> Option<ThreadId>;

    /// Capture the register state of `thread`.
    ///
    /// ## Errors
    ///
    /// [`CoreError::StateCaptureFailed`] if the thread's registers cannot be read.
    fn capture_state(&mut self, thread: ThreadId) -> CoreResult<RegisterFile>;

    /// Resynchronise the region map with the process.
    ///
    /// ## Errors
    ///
    /// [`CoreError::RegionRefreshFailed`] if the map cannot be read.
    fn refresh_regions(&mut self) -> CoreResult<()>;

    /// Memory view, consistent with the last refresh.
    fn memory(&self) -> &Self::Memory;
}

/// Reconstruct the call stack of the target's current thread.
///
/// Uses the architecture's default [`UnwindConfig`]. Refreshes the region
/// map before scanning. Returns an empty stack if there is no current
/// thread, its state cannot be captured, or the heuristic does not apply.
pub fn backtrace<T, C>(target: &mut T, classifier: &C) -> CallStack
where
    T: DebugTarget + ?Sized,
    C: CallClassifier + ?Sized,
{
    let config = UnwindConfig::for_architecture(target.architecture());
    backtrace_with_config(target, classifier, config)
}

/// [`backtrace`] with an explicit configuration.
pub fn backtrace_with_config<T, C>(target: &mut T, classifier: &C, config: UnwindConfig) -> CallStack
where
    T: DebugTarget + ?Sized,
    C: CallClassifier + ?Sized,
{
    match try_backtrace(target, classifier, config) {
        Ok(stack) => stack,
        Err(err) => {
            debug!(%err, "backtrace unavailable");
            CallStack::new()
        }
    }
}

fn try_backtrace<T, C>(target: &mut T, classifier: &C, config: UnwindConfig) -> CoreResult<CallStack>
where
    T: DebugTarget + ?Sized,
    C: CallClassifier + ?Sized,
{
    let thread = target.current_thread().ok_or(CoreError::NoThread)?;
    target.refresh_regions()?;

    let regs = target.capture_state(thread)?;
    if regs.architecture() != target.architecture() {
        return Err(CoreError::ArchitectureMismatch {
            expected: target.architecture(),
            found: regs.architecture(),
        });
    }

    debug!(%thread, arch = %regs.architecture(), "unwinding");
    Ok(StackUnwinder::new(config, target.memory(), classifier).unwind(&regs))
}

/// A stopped thread captured for offline analysis
///
/// Holds a register snapshot and the memory it points into, such as a
/// thread dumped from a core file. Implements [`DebugTarget`] so the same
/// [`backtrace`] path serves live and saved state.
///
/// ```rust
/// use stackscope_core::classify;
/// use stackscope_core::memory::MemorySnapshot;
/// use stackscope_core::registers::RegisterFile;
/// use stackscope_core::session::{backtrace, CapturedThread};
/// use stackscope_core::types::{Architecture, ThreadId};
///
/// let regs = RegisterFile::new(Architecture::X86_64);
/// let mut target = CapturedThread::new(ThreadId(1), regs, MemorySnapshot::new());
///
/// let classifier = classify::for_architecture(Architecture::X86_64);
/// assert!(backtrace(&mut target, &classifier).is_empty()); // unfilled registers
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedThread
{
    thread: ThreadId,
    registers: RegisterFile,
    memory: MemorySnapshot,
}

impl CapturedThread
{
    /// Bundle a thread's registers with its memory.
    pub fn new(thread: ThreadId, registers: RegisterFile, memory: MemorySnapshot) -> Self
    {
        Self {
            thread,
            registers,
            memory,
        }
    }

    /// The captured registers.
    pub fn registers(&self) -> &RegisterFile
    {
        &self.registers
    }

    /// Mutable access to the captured registers.
    pub fn registers_mut(&mut self) -> &mut RegisterFile
    {
        &mut self.registers
    }

    /// Mutable access to the captured memory.
    pub fn memory_mut(&mut self) -> &mut MemorySnapshot
    {
        &mut self.memory
    }
}

impl DebugTarget for CapturedThread
{
    type Memory = MemorySnapshot;

    fn architecture(&self) -> Architecture
    {
        self.registers.architecture()
    }

    fn current_thread(&self) -> Option<ThreadId>
    {
        Some(self.thread)
    }

    fn capture_state(&mut self, thread: ThreadId) -> CoreResult<RegisterFile>
    {
        if thread != self.thread {
            return Err(CoreError::StateCaptureFailed {
                thread,
                details: format!("only thread {} was captured", self.thread),
            });
        }
        Ok(self.registers.clone())
    }

    fn refresh_regions(&mut self) -> CoreResult<()>
    {
        Ok(())
    }

    fn memory(&self) -> &MemorySnapshot
    {
        &self.memory
    }
}
