//! AArch32 raw contexts (`user_regs`, `user_vfp`).

use smallvec::SmallVec;

use super::{general_block, low32, vector_block, ContextBlock, RawContext};
use crate::registers::RegisterFile;
use crate::types::Architecture;

const CPSR: usize = 16;
const ORIG_R0: usize = 17;

/// General-purpose registers as returned by `PTRACE_GETREGS` on ARM.
///
/// `uregs[0..16]` are `r0`-`r15`, `uregs[16]` is `cpsr` and `uregs[17]` is
/// `orig_r0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserRegsArm
{
    /// Register words in kernel order
    pub uregs: [u32; 18],
}

impl UserRegsArm
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self { uregs: [u32::MAX; 18] };
}

impl RawContext for UserRegsArm
{
    const ARCHITECTURE: Architecture = Architecture::Arm;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        let mut values = [0u64; CPSR];
        for (value, word) in values.iter_mut().zip(&self.uregs) {
            *value = u64::from(*word);
        }
        general_block(&values, u64::from(self.uregs[CPSR]), &[u64::from(self.uregs[ORIG_R0])])
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        let mut raw = Self::SENTINEL;
        let Some(state) = file.general_state() else {
            return raw;
        };

        for (index, word) in raw.uregs[..CPSR].iter_mut().enumerate() {
            *word = low32(state.get(index));
        }
        raw.uregs[CPSR] = low32(state.flags);
        raw.uregs[ORIG_R0] = low32(state.extra_word(0));
        raw
    }
}

/// VFP registers as returned by `PTRACE_GETVFPREGS`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserVfpArm
{
    /// `d0`-`d31`
    pub fpregs: [u64; 32],
    /// Floating-point status and control register
    pub fpscr: u32,
}

impl UserVfpArm
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        fpregs: [u64::MAX; 32],
        fpscr: u32::MAX,
    };
}

impl RawContext for UserVfpArm
{
    const ARCHITECTURE: Architecture = Architecture::Arm;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        vector_block(self.fpregs.iter().map(|d| u128::from(*d)), self.fpscr, std::iter::empty(), Vec::new())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_register_file(file: &RegisterFile) -> Self
    {
        let mut raw = Self::SENTINEL;
        let Some(state) = file.vector_state() else {
            return raw;
        };

        for (index, d) in raw.fpregs.iter_mut().enumerate() {
            *d = state.get(index).as_u128() as u64;
        }
        raw.fpscr = state.status;
        raw
    }
}
