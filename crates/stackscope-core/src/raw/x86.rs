//! IA-32 raw contexts (`user_regs_struct`, `user_fxsr_struct`).

use smallvec::SmallVec;

use super::{general_block, join_u128, low32, pack_u16, split_u128, unpack_u16, vector_block, ContextBlock, RawContext};
use crate::registers::RegisterFile;
use crate::types::Architecture;

const XMM_COUNT: usize = 8;
const ST_COUNT: usize = 8;

// Pass-through words of the FXSAVE block: x87 control state, `reserved`,
// then the padding area.
const CWD_SWD: usize = 0;
const TWD_FOP: usize = 1;
const FIP: usize = 2;
const FCS: usize = 3;
const FOO: usize = 4;
const FOS: usize = 5;
const RESERVED: usize = 6;
const PADDING: usize = 7;

/// General-purpose registers as returned by `PTRACE_GETREGS` on i386.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct UserRegsX86
{
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
    pub esi: u32,
    pub edi: u32,
    pub ebp: u32,
    pub eax: u32,
    pub xds: u32,
    pub xes: u32,
    pub xfs: u32,
    pub xgs: u32,
    pub orig_eax: u32,
    pub eip: u32,
    pub xcs: u32,
    pub eflags: u32,
    pub esp: u32,
    pub xss: u32,
}

impl UserRegsX86
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        ebx: u32::MAX,
        ecx: u32::MAX,
        edx: u32::MAX,
        esi: u32::MAX,
        edi: u32::MAX,
        ebp: u32::MAX,
        eax: u32::MAX,
        xds: u32::MAX,
        xes: u32::MAX,
        xfs: u32::MAX,
        xgs: u32::MAX,
        orig_eax: u32::MAX,
        eip: u32::MAX,
        xcs: u32::MAX,
        eflags: u32::MAX,
        esp: u32::MAX,
        xss: u32::MAX,
    };
}

impl RawContext for UserRegsX86
{
    const ARCHITECTURE: Architecture = Architecture::X86;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        // eax ecx edx ebx esp ebp esi edi, eip, then cs ss ds es fs gs
        let values = [
            self.eax, self.ecx, self.edx, self.ebx, self.esp, self.ebp, self.esi, self.edi, self.eip, self.xcs,
            self.xss, self.xds, self.xes, self.xfs, self.xgs,
        ]
        .map(u64::from);
        general_block(&values, u64::from(self.eflags), &[u64::from(self.orig_eax)])
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        let Some(state) = file.general_state() else {
            return Self::SENTINEL;
        };
        let gpr = |index: usize| low32(state.get(index));

        Self {
            eax: gpr(0),
            ecx: gpr(1),
            edx: gpr(2),
            ebx: gpr(3),
            esp: gpr(4),
            ebp: gpr(5),
            esi: gpr(6),
            edi: gpr(7),
            eip: gpr(8),
            xcs: gpr(9),
            xss: gpr(10),
            xds: gpr(11),
            xes: gpr(12),
            xfs: gpr(13),
            xgs: gpr(14),
            orig_eax: low32(state.extra_word(0)),
            eflags: low32(state.flags),
        }
    }
}

/// FXSAVE area as returned by `PTRACE_GETFPXREGS` on i386.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct UserFxsrX86
{
    pub cwd: u16,
    pub swd: u16,
    pub twd: u16,
    pub fop: u16,
    pub fip: u32,
    pub fcs: u32,
    pub foo: u32,
    pub fos: u32,
    pub mxcsr: u32,
    pub reserved: u32,
    /// x87 stack, 8 registers of 16 bytes each
    pub st_space: [u32; 32],
    /// `xmm0`-`xmm7`, 16 bytes each
    pub xmm_space: [u32; 32],
    pub padding: [u32; 56],
}

impl UserFxsrX86
{
    /// Every field all-ones.
    pub const SENTINEL: Self = Self {
        cwd: u16::MAX,
        swd: u16::MAX,
        twd: u16::MAX,
        fop: u16::MAX,
        fip: u32::MAX,
        fcs: u32::MAX,
        foo: u32::MAX,
        fos: u32::MAX,
        mxcsr: u32::MAX,
        reserved: u32::MAX,
        st_space: [u32::MAX; 32],
        xmm_space: [u32::MAX; 32],
        padding: [u32::MAX; 56],
    };
}

impl Default for UserFxsrX86
{
    fn default() -> Self
    {
        Self {
            cwd: 0,
            swd: 0,
            twd: 0,
            fop: 0,
            fip: 0,
            fcs: 0,
            foo: 0,
            fos: 0,
            mxcsr: 0,
            reserved: 0,
            st_space: [0; 32],
            xmm_space: [0; 32],
            padding: [0; 56],
        }
    }
}

impl RawContext for UserFxsrX86
{
    const ARCHITECTURE: Architecture = Architecture::X86;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        let mut extra = vec![
            pack_u16(self.cwd, self.swd),
            pack_u16(self.twd, self.fop),
            self.fip,
            self.fcs,
            self.foo,
            self.fos,
            self.reserved,
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
        (raw.twd, raw.fop) = unpack_u16(word(TWD_FOP));
        raw.fip = word(FIP);
        raw.fcs = word(FCS);
        raw.foo = word(FOO);
        raw.fos = word(FOS);
        raw.reserved = word(RESERVED);
        for (index, pad) in raw.padding.iter_mut().enumerate() {
            *pad = word(PADDING + index);
        }
        raw
    }
}
