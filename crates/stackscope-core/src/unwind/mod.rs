//! # Stack Unwinding
//!
//! Heuristic call-stack reconstruction without debug information.
//!
//! Starting at the frame pointer, every pointer-sized word of the stack
//! region is treated as a candidate return address. A candidate is accepted
//! when the bytes immediately before it decode as a call instruction that
//! ends exactly at the candidate. Frames come out innermost first.
//!
//! The scan can miss frames (code built without frame pointers) and can
//! report false positives (stack data that happens to follow a call
//! encoding). It never fails: anything that prevents the heuristic from
//! applying yields an empty [`CallStack`], and a word that cannot be read
//! is simply not a frame.

mod stack;

use tracing::{debug, trace};

pub use stack::{CallStack, StackFrame};

use crate::classify::CallClassifier;
use crate::memory::{MemoryAccess, RegionLookup};
use crate::registers::RegisterFile;
use crate::types::{Address, Architecture, MemoryRegion};

/// Parameters of one unwind
///
/// ```rust
/// use stackscope_core::types::Architecture;
/// use stackscope_core::unwind::UnwindConfig;
///
/// let config = UnwindConfig::for_architecture(Architecture::X86_64).with_max_frames(64);
/// assert_eq!(config.pointer_width, 8);
/// assert_eq!((config.min_call_len, config.max_call_len), (2, 7));
/// assert_eq!(config.max_frames, Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwindConfig
{
    /// Size of a stack word in bytes (4 or 8)
    pub pointer_width: u8,
    /// Shortest encoded call instruction
    pub min_call_len: usize,
    /// Longest encoded call instruction
    pub max_call_len: usize,
    /// Stop after this many frames; `None` scans the whole region
    pub max_frames: Option<usize>,
    /// Clear bit 0 of every candidate before decoding. AArch32 stores a
    /// Thumb return address as `address | 1`; the frame reports the even
    /// address.
    pub thumb_interworking: bool,
}

impl UnwindConfig
{
    /// Pointer width and call length bounds of `architecture`, no frame limit.
    pub const fn for_architecture(architecture: Architecture) -> Self
    {
        let (min_call_len, max_call_len) = architecture.call_length_bounds();
        Self {
            pointer_width: architecture.pointer_size_bytes(),
            min_call_len,
            max_call_len,
            max_frames: None,
            thumb_interworking: matches!(architecture, Architecture::Arm),
        }
    }

    /// Limit the number of frames produced.
    #[must_use]
    pub const fn with_max_frames(mut self, max_frames: usize) -> Self
    {
        self.max_frames = Some(max_frames);
        self
    }

    /// Override the call instruction length bounds.
    #[must_use]
    pub const fn with_call_length_bounds(mut self, min_call_len: usize, max_call_len: usize) -> Self
    {
        self.min_call_len = min_call_len;
        self.max_call_len = max_call_len;
        self
    }

    /// `true` if the bounds describe a non-empty range of positive lengths.
    pub const fn is_valid(&self) -> bool
    {
        self.pointer_width != 0 && self.min_call_len != 0 && self.min_call_len <= self.max_call_len
    }
}

/// Heuristic stack unwinder
///
/// Borrows the memory view and classifier for one or more unwinds; it keeps
/// no state between calls.
///
/// ```rust
/// use stackscope_core::classify::Arm64CallClassifier;
/// use stackscope_core::memory::MemorySnapshot;
/// use stackscope_core::raw::arm64::UserPtRegsArm64;
/// use stackscope_core::registers::RegisterFile;
/// use stackscope_core::types::{Address, Architecture};
/// use stackscope_core::unwind::{StackUnwinder, UnwindConfig};
///
/// let mut memory = MemorySnapshot::new();
/// // caller code: `bl` at 0x40_0000, so the return address is 0x40_0004
/// memory.map(Address::from(0x40_0000), 0x9400_0010u32.to_le_bytes().to_vec(), "r-x", None).unwrap();
/// memory.map(Address::from(0x7f00), vec![0; 0x100], "rw-", Some("[stack]")).unwrap();
/// memory.write_pointer(Address::from(0x7f18), 0x40_0004, 8).unwrap();
///
/// let mut raw = UserPtRegsArm64::default();
/// raw.regs[29] = 0x7f10;
/// raw.sp = 0x7f00;
/// let mut regs = RegisterFile::new(Architecture::Arm64);
/// regs.fill(&raw).unwrap();
///
/// let config = UnwindConfig::for_architecture(Architecture::Arm64);
/// let stack = StackUnwinder::new(config, &memory, &Arm64CallClassifier).unwind(&regs);
/// assert_eq!(stack.size(), 1);
/// assert_eq!(stack.top().map(|f| f.caller_address()), Some(Address::from(0x40_0000)));
/// ```
#[derive(Debug)]
pub struct StackUnwinder<'a, M: ?Sized, C: ?Sized>
{
    config: UnwindConfig,
    memory: &'a M,
    classifier: &'a C,
}

impl<'a, M, C> StackUnwinder<'a, M, C>
where
    M: MemoryAccess + RegionLookup + ?Sized,
    C: CallClassifier + ?Sized,
{
    /// Create an unwinder over `memory` using `classifier`.
    pub fn new(config: UnwindConfig, memory: &'a M, classifier: &'a C) -> Self
    {
        Self {
            config,
            memory,
            classifier,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &UnwindConfig
    {
        &self.config
    }

    /// Reconstruct the call stack of the thread `regs` was captured from.
    ///
    /// Returns an empty stack when the register file is unfilled, when the
    /// frame or stack pointer is not aligned to the pointer width, or when
    /// they do not lie in the same memory region.
    pub fn unwind(&self, regs: &RegisterFile) -> CallStack
    {
        let mut stack = CallStack::new();

        if !self.config.is_valid() {
            debug!(config = ?self.config, "invalid unwind configuration");
            return stack;
        }

        let (Some(fp), Some(sp)) = (regs.frame_pointer(), regs.stack_pointer()) else {
            debug!("register file holds no general-purpose state, nothing to unwind");
            return stack;
        };

        let Some(region) = self.stack_region(fp, sp) else {
            return stack;
        };

        let width = u64::from(self.config.pointer_width);
        let mut address = fp;
        while region.contains(address) {
            if self.config.max_frames.is_some_and(|limit| stack.len() >= limit) {
                trace!(limit = stack.len(), "frame limit reached");
                break;
            }

            if let Some(frame) = self.frame_at(address) {
                trace!(slot = %address, %frame, "frame");
                stack.push_outermost(frame);
            }

            match address.checked_add(width) {
                Some(next) => address = next,
                None => break,
            }
        }

        debug!(frames = stack.len(), region = ?region.name, "unwind finished");
        stack
    }

    /// Region to scan, if the frame and stack pointers allow the heuristic.
    fn stack_region(&self, fp: Address, sp: Address) -> Option<MemoryRegion>
    {
        let width = u64::from(self.config.pointer_width);
        if !fp.is_aligned(width) || !sp.is_aligned(width) {
            debug!(%fp, %sp, width, "misaligned frame or stack pointer, frame pointers not in use");
            return None;
        }

        let Some(sp_region) = self.memory.find_region(sp) else {
            debug!(%sp, "stack pointer is not in a mapped region");
            return None;
        };
        let Some(fp_region) = self.memory.find_region(fp) else {
            debug!(%fp, "frame pointer is not in a mapped region");
            return None;
        };

        if fp_region.id != sp_region.id {
            debug!(%fp, %sp, "frame pointer is outside the stack region, used as a general register");
            return None;
        }
        Some(fp_region)
    }

    /// The frame whose return address is stored at `slot`, if any.
    fn frame_at(&self, slot: Address) -> Option<StackFrame>
    {
        let word = match self.memory.read_pointer(slot, self.config.pointer_width) {
            Ok(word) => word,
            Err(err) => {
                trace!(%slot, %err, "stack word unreadable");
                return None;
            }
        };

        let candidate = if self.config.thumb_interworking {
            Address::from(word & !1)
        } else {
            Address::from(word)
        };
        let max = self.config.max_call_len;
        let min = self.config.min_call_len;
        let window_start = candidate.checked_sub(max as u64)?;
        let window = match self.memory.read_bytes(window_start, max) {
            Ok(window) => window,
            Err(err) => {
                trace!(%slot, %candidate, %err, "code before candidate unreadable");
                return None;
            }
        };

        // Longest encoding first: offset 0 is a call of `max` bytes.
        (0..=max - min).find_map(|offset| {
            let len = max - offset;
            let bytes = window.get(offset..)?;
            (self.classifier.call_length(bytes) == Some(len)).then(|| {
                StackFrame::new(candidate, window_start + offset as u64)
            })
        })
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_config_for_each_architecture()
    {
        let x86 = UnwindConfig::for_architecture(Architecture::X86);
        assert_eq!((x86.pointer_width, x86.min_call_len, x86.max_call_len), (4, 2, 7));
        let arm = UnwindConfig::for_architecture(Architecture::Arm);
        assert_eq!((arm.pointer_width, arm.min_call_len, arm.max_call_len), (4, 2, 4));
        let arm64 = UnwindConfig::for_architecture(Architecture::Arm64);
        assert_eq!((arm64.pointer_width, arm64.min_call_len, arm64.max_call_len), (8, 4, 4));
        assert_eq!(arm64.max_frames, None);
        assert!(arm.thumb_interworking);
        assert!(!x86.thumb_interworking && !arm64.thumb_interworking);
    }

    #[test]
    fn test_config_validity()
    {
        let config = UnwindConfig::for_architecture(Architecture::X86_64);
        assert!(config.is_valid());
        assert!(!config.with_call_length_bounds(5, 4).is_valid());
        assert!(!config.with_call_length_bounds(0, 4).is_valid());
    }
}
