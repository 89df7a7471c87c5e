//! x86-64 raw contexts (`user_regs_struct`, `user_fpregs_struct`).

use smallvec::SmallVec;

use super::{general_block, join_u128, pack_u16, split_u128, unpack_u16, vector_block, ContextBlock, RawContext};
use crate::registers::{RegisterFile, REGISTER_SENTINEL};
use crate::types::Architecture;

// Canonical GPR slots, see `registers::tables::X86_64`.
const RAX: usize = 0;
const RCX: usize = 1;
const RDX: usize = 2;
const RBX: usize = 3;
const RSP: usize = 4;
const RBP: usize = 5;
const RSI: usize = 6;
const RDI: usize = 7;
const R8: usize = 8;
const RIP: usize = 16;
const CS: usize = 17;
const SS: usize = 18;
const DS: usize = 19;
const ES: usize = 20;
const FS: usize = 21;
const GS: usize = 22;
const FS_BASE: usize = 23;
const GS_BASE: usize = 24;

const XMM_COUNT: usize = 16;
const ST_COUNT: usize = 8;

// Pass-through words of the FXSAVE block: x87 control state, `mxcr_mask`,
// then the padding area.
const CWD_SWD: usize = 0;
const FTW_FOP: usize = 1;
const FPU_RIP: usize = 2;
const FPU_RDP: usize = 4;
const MXCR_MASK: usize = 6;
const PADDING: usize = 7;

/// General-purpose registers as returned by `PTRACE_GETREGS` on x86-64.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct UserRegsX86_64
{
    pub r15: u64,
    pub r14: u64,
    pub r13: u64,
    pub r12: u64,
    pub rbp: u64,
    pub rbx: u64,
    pub r11: u64,
    pub r10: u64,
    pub r9: u64,
    pub r8: u64,
    pub rax: u64,
    pub rcx: u64,
    pub rdx: u64,
    pub rsi: u64,
    pub rdi: u64,
    pub orig_rax: u64,
    pub rip: u64,
    pub cs: u64,
    pub eflags: u64,
    pub rsp: u64,
    pub ss: u64,
    pub fs_base: u64,
    pub gs_base: u64,
    pub ds: u64,
    pub es: u64,
    pub fs: u64,
    pub gs: u64,
}

impl UserRegsX86_64
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        r15: REGISTER_SENTINEL,
        r14: REGISTER_SENTINEL,
        r13: REGISTER_SENTINEL,
        r12: REGISTER_SENTINEL,
        rbp: REGISTER_SENTINEL,
        rbx: REGISTER_SENTINEL,
        r11: REGISTER_SENTINEL,
        r10: REGISTER_SENTINEL,
        r9: REGISTER_SENTINEL,
        r8: REGISTER_SENTINEL,
        rax: REGISTER_SENTINEL,
        rcx: REGISTER_SENTINEL,
        rdx: REGISTER_SENTINEL,
        rsi: REGISTER_SENTINEL,
        rdi: REGISTER_SENTINEL,
        orig_rax: REGISTER_SENTINEL,
        rip: REGISTER_SENTINEL,
        cs: REGISTER_SENTINEL,
        eflags: REGISTER_SENTINEL,
        rsp: REGISTER_SENTINEL,
        ss: REGISTER_SENTINEL,
        fs_base: REGISTER_SENTINEL,
        gs_base: REGISTER_SENTINEL,
        ds: REGISTER_SENTINEL,
        es: REGISTER_SENTINEL,
        fs: REGISTER_SENTINEL,
        gs: REGISTER_SENTINEL,
    };
}

impl RawContext for UserRegsX86_64
{
    const ARCHITECTURE: Architecture = Architecture::X86_64;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        let values = [
            self.rax, self.rcx, self.rdx, self.rbx, self.rsp, self.rbp, self.rsi, self.rdi, // legacy eight
            self.r8, self.r9, self.r10, self.r11, self.r12, self.r13, self.r14, self.r15, // REX registers
            self.rip, self.cs, self.ss, self.ds, self.es, self.fs, self.gs, self.fs_base, self.gs_base,
        ];
        general_block(&values, self.eflags, &[self.orig_rax])
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        let Some(state) = file.general_state() else {
            return Self::SENTINEL;
        };
        let gpr = |index: usize| state.get(index);

        Self {
            r15: gpr(R8 + 7),
            r14: gpr(R8 + 6),
            r13: gpr(R8 + 5),
            r12: gpr(R8 + 4),
            rbp: gpr(RBP),
            rbx: gpr(RBX),
            r11: gpr(R8 + 3),
            r10: gpr(R8 + 2),
            r9: gpr(R8 + 1),
            r8: gpr(R8),
            rax: gpr(RAX),
            rcx: gpr(RCX),
            rdx: gpr(RDX),
            rsi: gpr(RSI),
            rdi: gpr(RDI),
            orig_rax: state.extra_word(0),
            rip: gpr(RIP),
            cs: gpr(CS),
            eflags: state.flags,
            rsp: gpr(RSP),
            ss: gpr(SS),
            fs_base: gpr(FS_BASE),
            gs_base: gpr(GS_BASE),
            ds: gpr(DS),
            es: gpr(ES),
            fs: gpr(FS),
            gs: gpr(GS),
        }
    }
}

/// FXSAVE area as returned by `PTRACE_GETFPREGS` on x86-64.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct UserFpRegsX86_64
{
    pub cwd: u16,
    pub swd: u16,
    pub ftw: u16,
    pub fop: u16,
    pub rip: u64,
    pub rdp: u64,
    pub mxcsr: u32,
    pub mxcr_mask: u32,
    /// x87 stack, 8 registers of 16 bytes each
    pub st_space: [u32; 32],
    /// `xmm0`-`xmm15`, 16 bytes each
    pub xmm_space: [u32; 64],
    pub padding: [u32; 24],
}

impl UserFpRegsX86_64
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        cwd: u16::MAX,
        swd: u16::MAX,
        ftw: u16::MAX,
        fop: u16::MAX,
        rip: REGISTER_SENTINEL,
        rdp: REGISTER_SENTINEL,
        mxcsr: u32::MAX,
        mxcr_mask: u32::MAX,
        st_space: [u32::MAX; 32],
        xmm_space: [u32::MAX; 64],
        padding: [u32::MAX; 24],
    };

    /// Value of `xmm{index}`.
    pub fn xmm(&self, index: usize) -> Option<u128>
    {
        self.xmm_space.get(index * 4..index * 4 + 4).map(join_u128)
    }
}

impl Default for UserFpRegsX86_64
{
    fn default() -> Self
    {
        Self {
            cwd: 0,
            swd: 0,
            ftw: 0,
            fop: 0,
            rip: 0,
            rdp: 0,
            mxcsr: 0,
            mxcr_mask: 0,
            st_space: [0; 32],
            xmm_space: [0; 64],
            padding: [0; 24],
        }
    }
}

impl RawContext for UserFpRegsX86_64
{
    const ARCHITECTURE: Architecture = Architecture::X86_64;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        let [rip_lo, rip_hi] = split_u64(self.rip);
        let [rdp_lo, rdp_hi] = split_u64(self.rdp);
        let mut extra = vec![
            pack_u16(self.cwd, self.swd),
            pack_u16(self.ftw, self.fop),
            rip_lo,
            rip_hi,
            rdp_lo,
            rdp_hi,
            self.mxcr_mask,
        ];
        extra.extend_from_slice(&self.padding);

        vector_block(
            self.xmm_space.chunks_exact(4).map(join_u128),
            self.mxcsr,
            self.st_space.chunks_exact(4).map(join_u128),
            extra,
        )
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        let mut raw = Self::SENTINEL;
        let Some(state) = file.vector_state() else {
            return raw;
        };

        raw.mxcsr = state.status;
        for (index, lane) in raw.xmm_space.chunks_exact_mut(4).enumerate().take(XMM_COUNT) {
            lane.copy_from_slice(&split_u128(state.get(index).as_u128()));
        }
        for (index, lane) in raw.st_space.chunks_exact_mut(4).enumerate().take(ST_COUNT) {
            lane.copy_from_slice(&split_u128(state.x87_register(index).as_u128()));
        }

        let word = |index: usize| state.extra_word(index);
        (raw.cwd, raw.swd) = unpack_u16(word(CWD_SWD));
        (raw.ftw, raw.fop) = unpack_u16(word(FTW_FOP));
        raw.rip = join_u64(word(FPU_RIP), word(FPU_RIP + 1));
        raw.rdp = join_u64(word(FPU_RDP), word(FPU_RDP + 1));
        raw.mxcr_mask = word(MXCR_MASK);
        for (index, pad) in raw.padding.iter_mut().enumerate() {
            *pad = word(PADDING + index);
        }
        raw
    }
}

#[allow(clippy::cast_possible_truncation)]
fn split_u64(value: u64) -> [u32; 2]
{
    [value as u32, (value >> 32) as u32]
}

fn join_u64(low: u32, high: u32) -> u64
{
    u64::from(low) | (u64::from(high) << 32)
}
