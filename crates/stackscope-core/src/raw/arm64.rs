//! AArch64 raw contexts (`user_pt_regs`, `user_fpsimd_state`).

use smallvec::SmallVec;

use super::{general_block, vector_block, ContextBlock, RawContext};
use crate::registers::{RegisterFile, REGISTER_SENTINEL};
use crate::types::Architecture;

const SP: usize = 31;
const PC: usize = 32;

/// General-purpose registers as returned by `PTRACE_GETREGSET(NT_PRSTATUS)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserPtRegsArm64
{
    /// `x0`-`x30`
    pub regs: [u64; 31],
    /// Stack pointer
    pub sp: u64,
    /// Program counter
    pub pc: u64,
    /// Processor state
    pub pstate: u64,
}

impl UserPtRegsArm64
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        regs: [REGISTER_SENTINEL; 31],
        sp: REGISTER_SENTINEL,
        pc: REGISTER_SENTINEL,
        pstate: REGISTER_SENTINEL,
    };
}

impl RawContext for UserPtRegsArm64
{
    const ARCHITECTURE: Architecture = Architecture::Arm64;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        let mut values = [0u64; PC + 1];
        values[..SP].copy_from_slice(&self.regs);
        values[SP] = self.sp;
        values[PC] = self.pc;
        general_block(&values, self.pstate, &[])
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        let mut raw = Self::SENTINEL;
        let Some(state) = file.general_state() else {
            return raw;
        };

        for (index, reg) in raw.regs.iter_mut().enumerate() {
            *reg = state.get(index);
        }
        raw.sp = state.get(SP);
        raw.pc = state.get(PC);
        raw.pstate = state.flags;
        raw
    }
}

/// FP/SIMD registers as returned by `PTRACE_GETREGSET(NT_PRFPREG)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFpsimdArm64
{
    /// `v0`-`v31`
    pub vregs: [u128; 32],
    /// Floating-point status register
    pub fpsr: u32,
    /// Floating-point control register
    pub fpcr: u32,
    #[allow(missing_docs)]
    pub reserved: [u32; 2],
}

impl UserFpsimdArm64
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        vregs: [u128::MAX; 32],
        fpsr: u32::MAX,
        fpcr: u32::MAX,
        reserved: [u32::MAX; 2],
    };
}

impl Default for UserFpsimdArm64
{
    fn default() -> Self
    {
        Self {
            vregs: [0; 32],
            fpsr: 0,
            fpcr: 0,
            reserved: [0; 2],
        }
    }
}

impl RawContext for UserFpsimdArm64
{
    const ARCHITECTURE: Architecture = Architecture::Arm64;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        let extra = vec![self.fpcr, self.reserved[0], self.reserved[1]];
        vector_block(self.vregs, self.fpsr, std::iter::empty(), extra)
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        let mut raw = Self::SENTINEL;
        let Some(state) = file.vector_state() else {
            return raw;
        };

        for (index, v) in raw.vregs.iter_mut().enumerate() {
            *v = state.get(index).as_u128();
        }
        raw.fpsr = state.status;
        raw.fpcr = state.extra_word(0);
        raw.reserved = [state.extra_word(1), state.extra_word(2)];
        raw
    }
}
