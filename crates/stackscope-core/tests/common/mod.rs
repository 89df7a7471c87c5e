//! Synthetic processes shared by the integration tests.

#![allow(dead_code)]

use stackscope_core::memory::MemorySnapshot;
use stackscope_core::raw::arm::UserRegsArm;
use stackscope_core::raw::arm64::UserPtRegsArm64;
use stackscope_core::raw::x86::UserRegsX86;
use stackscope_core::raw::x86_64::UserRegsX86_64;
use stackscope_core::registers::RegisterFile;
use stackscope_core::types::{Address, Architecture, MemoryRegionId};
use stackscope_utils::{init_logging_with_level, LogFormat, LogLevel};

pub const CODE_BASE: u64 = 0x40_0000;
pub const CODE_SIZE: usize = 0x1000;
pub const STACK_BASE: u64 = 0x7ff0_0000;
pub const STACK_SIZE: usize = 0x1000;
pub const HEAP_BASE: u64 = 0x6000_0000;

/// Install a debug-level subscriber once; later calls are no-ops.
pub fn init_tracing()
{
    let _ = init_logging_with_level(LogLevel::Debug, LogFormat::Pretty);
}

/// A code region, a stack region and a heap region, with helpers to seed
/// call sites and return addresses.
pub struct SyntheticProcess
{
    pub memory: MemorySnapshot,
    pub code: MemoryRegionId,
    pub stack: MemoryRegionId,
    pub heap: MemoryRegionId,
    pub pointer_width: u8,
}

impl SyntheticProcess
{
    /// `filler` is the byte the code region is initialised with; it must not
    /// start a call instruction on the architecture under test.
    pub fn new(architecture: Architecture, filler: u8) -> Self
    {
        let mut memory = MemorySnapshot::new();
        let code = memory
            .map(Address::from(CODE_BASE), vec![filler; CODE_SIZE], "r-x", Some("/usr/bin/app"))
            .unwrap();
        let stack = memory
            .map(Address::from(STACK_BASE), vec![0; STACK_SIZE], "rw-", Some("[stack]"))
            .unwrap();
        let heap = memory
            .map(Address::from(HEAP_BASE), vec![0; 0x100], "rw-", Some("[heap]"))
            .unwrap();

        Self {
            memory,
            code,
            stack,
            heap,
            pointer_width: architecture.pointer_size_bytes(),
        }
    }

    /// Write a call instruction at `caller`; returns the return address.
    pub fn call_site(&mut self, caller: u64, encoding: &[u8]) -> u64
    {
        self.memory.write(Address::from(caller), encoding).unwrap();
        caller + encoding.len() as u64
    }

    /// Store a pointer-sized word at `slot`.
    pub fn store(&mut self, slot: u64, value: u64)
    {
        self.memory
            .write_pointer(Address::from(slot), value, self.pointer_width)
            .unwrap();
    }
}

pub fn x86_64_registers(sp: u64, fp: u64) -> RegisterFile
{
    let raw = UserRegsX86_64 {
        rsp: sp,
        rbp: fp,
        rip: CODE_BASE + 0x800,
        ..Default::default()
    };
    let mut regs = RegisterFile::new(Architecture::X86_64);
    regs.fill(&raw).unwrap();
    regs
}

pub fn x86_registers(sp: u32, fp: u32) -> RegisterFile
{
    let raw = UserRegsX86 {
        esp: sp,
        ebp: fp,
        ..Default::default()
    };
    let mut regs = RegisterFile::new(Architecture::X86);
    regs.fill(&raw).unwrap();
    regs
}

pub fn arm_registers(sp: u32, fp: u32) -> RegisterFile
{
    let mut raw = UserRegsArm::default();
    raw.uregs[11] = fp;
    raw.uregs[13] = sp;
    let mut regs = RegisterFile::new(Architecture::Arm);
    regs.fill(&raw).unwrap();
    regs
}

pub fn arm64_registers(sp: u64, fp: u64) -> RegisterFile
{
    let mut raw = UserPtRegsArm64::default();
    raw.regs[29] = fp;
    raw.sp = sp;
    let mut regs = RegisterFile::new(Architecture::Arm64);
    regs.fill(&raw).unwrap();
    regs
}

/// Registers with the conventional frame layout for `architecture`.
pub fn registers(architecture: Architecture, sp: u64, fp: u64) -> RegisterFile
{
    match architecture {
        Architecture::X86 => x86_registers(sp as u32, fp as u32),
        Architecture::X86_64 => x86_64_registers(sp, fp),
        Architecture::Arm => arm_registers(sp as u32, fp as u32),
        Architecture::Arm64 => arm64_registers(sp, fp),
    }
}
