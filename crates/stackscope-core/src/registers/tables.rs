//! Static register alias tables, one per architecture.
//!
//! Each entry lists the role a register plays, where its value is stored in a
//! [`RegisterFile`](super::RegisterFile), its width, and every accepted name.
//! The first name is the canonical one used for display. Names are stored in
//! lowercase; lookups fold the query to lowercase before matching.
//!
//! GPR slot order follows the hardware encoding (`rax, rcx, rdx, rbx, ...` on
//! x86), with the instruction pointer appended after the encodable registers
//! where the ISA does not already number it. x86 segment state follows the
//! instruction pointer.

use super::{RegisterAliasTable, RegisterDef, RegisterRole, RegisterSlot};
use crate::types::Architecture;

macro_rules! reg {
    ($role:expr, $slot:expr, $bits:expr, [$($name:literal),+ $(,)?]) => {
        RegisterDef {
            role: $role,
            slot: $slot,
            bits: $bits,
            names: &[$($name),+],
        }
    };
}

const X86_REGISTERS: &[RegisterDef] = &[
    reg!(RegisterRole::General(0), RegisterSlot::Gpr(0), 32, ["eax"]),
    reg!(RegisterRole::General(1), RegisterSlot::Gpr(1), 32, ["ecx"]),
    reg!(RegisterRole::General(2), RegisterSlot::Gpr(2), 32, ["edx"]),
    reg!(RegisterRole::General(3), RegisterSlot::Gpr(3), 32, ["ebx"]),
    reg!(RegisterRole::StackPointer, RegisterSlot::Gpr(4), 32, ["esp"]),
    reg!(RegisterRole::FramePointer, RegisterSlot::Gpr(5), 32, ["ebp"]),
    reg!(RegisterRole::General(6), RegisterSlot::Gpr(6), 32, ["esi"]),
    reg!(RegisterRole::General(7), RegisterSlot::Gpr(7), 32, ["edi"]),
    reg!(RegisterRole::InstructionPointer, RegisterSlot::Gpr(8), 32, ["eip"]),
    reg!(RegisterRole::Flags, RegisterSlot::Flags, 32, ["eflags"]),
    reg!(RegisterRole::Segment(0), RegisterSlot::Gpr(9), 16, ["cs"]),
    reg!(RegisterRole::Segment(1), RegisterSlot::Gpr(10), 16, ["ss"]),
    reg!(RegisterRole::Segment(2), RegisterSlot::Gpr(11), 16, ["ds"]),
    reg!(RegisterRole::Segment(3), RegisterSlot::Gpr(12), 16, ["es"]),
    reg!(RegisterRole::Segment(4), RegisterSlot::Gpr(13), 16, ["fs"]),
    reg!(RegisterRole::Segment(5), RegisterSlot::Gpr(14), 16, ["gs"]),
    reg!(RegisterRole::Vector(0), RegisterSlot::Vector(0), 128, ["xmm0"]),
    reg!(RegisterRole::Vector(1), RegisterSlot::Vector(1), 128, ["xmm1"]),
    reg!(RegisterRole::Vector(2), RegisterSlot::Vector(2), 128, ["xmm2"]),
    reg!(RegisterRole::Vector(3), RegisterSlot::Vector(3), 128, ["xmm3"]),
    reg!(RegisterRole::Vector(4), RegisterSlot::Vector(4), 128, ["xmm4"]),
    reg!(RegisterRole::Vector(5), RegisterSlot::Vector(5), 128, ["xmm5"]),
    reg!(RegisterRole::Vector(6), RegisterSlot::Vector(6), 128, ["xmm6"]),
    reg!(RegisterRole::Vector(7), RegisterSlot::Vector(7), 128, ["xmm7"]),
    reg!(RegisterRole::FloatStatus, RegisterSlot::FloatStatus, 32, ["mxcsr"]),
    reg!(RegisterRole::X87(0), RegisterSlot::X87(0), 80, ["st0", "st(0)"]),
    reg!(RegisterRole::X87(1), RegisterSlot::X87(1), 80, ["st1", "st(1)"]),
    reg!(RegisterRole::X87(2), RegisterSlot::X87(2), 80, ["st2", "st(2)"]),
    reg!(RegisterRole::X87(3), RegisterSlot::X87(3), 80, ["st3", "st(3)"]),
    reg!(RegisterRole::X87(4), RegisterSlot::X87(4), 80, ["st4", "st(4)"]),
    reg!(RegisterRole::X87(5), RegisterSlot::X87(5), 80, ["st5", "st(5)"]),
    reg!(RegisterRole::X87(6), RegisterSlot::X87(6), 80, ["st6", "st(6)"]),
    reg!(RegisterRole::X87(7), RegisterSlot::X87(7), 80, ["st7", "st(7)"]),
];

/// IA-32: eight GPRs plus `eip`, `eflags`, the segment selectors, `xmm0`-`xmm7`,
/// `mxcsr` and the x87 stack `st0`-`st7`.
pub static X86: RegisterAliasTable =
    RegisterAliasTable::new(Architecture::X86, 15, 32, 8, 128, X86_REGISTERS);

const X86_64_REGISTERS: &[RegisterDef] = &[
    reg!(RegisterRole::General(0), RegisterSlot::Gpr(0), 64, ["rax"]),
    reg!(RegisterRole::General(1), RegisterSlot::Gpr(1), 64, ["rcx"]),
    reg!(RegisterRole::General(2), RegisterSlot::Gpr(2), 64, ["rdx"]),
    reg!(RegisterRole::General(3), RegisterSlot::Gpr(3), 64, ["rbx"]),
    reg!(RegisterRole::StackPointer, RegisterSlot::Gpr(4), 64, ["rsp"]),
    reg!(RegisterRole::FramePointer, RegisterSlot::Gpr(5), 64, ["rbp"]),
    reg!(RegisterRole::General(6), RegisterSlot::Gpr(6), 64, ["rsi"]),
    reg!(RegisterRole::General(7), RegisterSlot::Gpr(7), 64, ["rdi"]),
    reg!(RegisterRole::General(8), RegisterSlot::Gpr(8), 64, ["r8"]),
    reg!(RegisterRole::General(9), RegisterSlot::Gpr(9), 64, ["r9"]),
    reg!(RegisterRole::General(10), RegisterSlot::Gpr(10), 64, ["r10"]),
    reg!(RegisterRole::General(11), RegisterSlot::Gpr(11), 64, ["r11"]),
    reg!(RegisterRole::General(12), RegisterSlot::Gpr(12), 64, ["r12"]),
    reg!(RegisterRole::General(13), RegisterSlot::Gpr(13), 64, ["r13"]),
    reg!(RegisterRole::General(14), RegisterSlot::Gpr(14), 64, ["r14"]),
    reg!(RegisterRole::General(15), RegisterSlot::Gpr(15), 64, ["r15"]),
    reg!(RegisterRole::InstructionPointer, RegisterSlot::Gpr(16), 64, ["rip"]),
    reg!(RegisterRole::Flags, RegisterSlot::Flags, 64, ["rflags"]),
    reg!(RegisterRole::Segment(0), RegisterSlot::Gpr(17), 16, ["cs"]),
    reg!(RegisterRole::Segment(1), RegisterSlot::Gpr(18), 16, ["ss"]),
    reg!(RegisterRole::Segment(2), RegisterSlot::Gpr(19), 16, ["ds"]),
    reg!(RegisterRole::Segment(3), RegisterSlot::Gpr(20), 16, ["es"]),
    reg!(RegisterRole::Segment(4), RegisterSlot::Gpr(21), 16, ["fs"]),
    reg!(RegisterRole::Segment(5), RegisterSlot::Gpr(22), 16, ["gs"]),
    reg!(RegisterRole::SegmentBase(0), RegisterSlot::Gpr(23), 64, ["fs_base"]),
    reg!(RegisterRole::SegmentBase(1), RegisterSlot::Gpr(24), 64, ["gs_base"]),
    reg!(RegisterRole::Vector(0), RegisterSlot::Vector(0), 128, ["xmm0"]),
    reg!(RegisterRole::Vector(1), RegisterSlot::Vector(1), 128, ["xmm1"]),
    reg!(RegisterRole::Vector(2), RegisterSlot::Vector(2), 128, ["xmm2"]),
    reg!(RegisterRole::Vector(3), RegisterSlot::Vector(3), 128, ["xmm3"]),
    reg!(RegisterRole::Vector(4), RegisterSlot::Vector(4), 128, ["xmm4"]),
    reg!(RegisterRole::Vector(5), RegisterSlot::Vector(5), 128, ["xmm5"]),
    reg!(RegisterRole::Vector(6), RegisterSlot::Vector(6), 128, ["xmm6"]),
    reg!(RegisterRole::Vector(7), RegisterSlot::Vector(7), 128, ["xmm7"]),
    reg!(RegisterRole::Vector(8), RegisterSlot::Vector(8), 128, ["xmm8"]),
    reg!(RegisterRole::Vector(9), RegisterSlot::Vector(9), 128, ["xmm9"]),
    reg!(RegisterRole::Vector(10), RegisterSlot::Vector(10), 128, ["xmm10"]),
    reg!(RegisterRole::Vector(11), RegisterSlot::Vector(11), 128, ["xmm11"]),
    reg!(RegisterRole::Vector(12), RegisterSlot::Vector(12), 128, ["xmm12"]),
    reg!(RegisterRole::Vector(13), RegisterSlot::Vector(13), 128, ["xmm13"]),
    reg!(RegisterRole::Vector(14), RegisterSlot::Vector(14), 128, ["xmm14"]),
    reg!(RegisterRole::Vector(15), RegisterSlot::Vector(15), 128, ["xmm15"]),
    reg!(RegisterRole::FloatStatus, RegisterSlot::FloatStatus, 32, ["mxcsr"]),
    reg!(RegisterRole::X87(0), RegisterSlot::X87(0), 80, ["st0", "st(0)"]),
    reg!(RegisterRole::X87(1), RegisterSlot::X87(1), 80, ["st1", "st(1)"]),
    reg!(RegisterRole::X87(2), RegisterSlot::X87(2), 80, ["st2", "st(2)"]),
    reg!(RegisterRole::X87(3), RegisterSlot::X87(3), 80, ["st3", "st(3)"]),
    reg!(RegisterRole::X87(4), RegisterSlot::X87(4), 80, ["st4", "st(4)"]),
    reg!(RegisterRole::X87(5), RegisterSlot::X87(5), 80, ["st5", "st(5)"]),
    reg!(RegisterRole::X87(6), RegisterSlot::X87(6), 80, ["st6", "st(6)"]),
    reg!(RegisterRole::X87(7), RegisterSlot::X87(7), 80, ["st7", "st(7)"]),
];

/// x86-64: sixteen GPRs plus `rip`, `rflags`, the segment selectors and bases,
/// `xmm0`-`xmm15`, `mxcsr` and the x87 stack `st0`-`st7`.
pub static X86_64: RegisterAliasTable =
    RegisterAliasTable::new(Architecture::X86_64, 25, 64, 16, 128, X86_64_REGISTERS);

const ARM_REGISTERS: &[RegisterDef] = &[
    reg!(RegisterRole::General(0), RegisterSlot::Gpr(0), 32, ["r0", "a1"]),
    reg!(RegisterRole::General(1), RegisterSlot::Gpr(1), 32, ["r1", "a2"]),
    reg!(RegisterRole::General(2), RegisterSlot::Gpr(2), 32, ["r2", "a3"]),
    reg!(RegisterRole::General(3), RegisterSlot::Gpr(3), 32, ["r3", "a4"]),
    reg!(RegisterRole::General(4), RegisterSlot::Gpr(4), 32, ["r4", "v1"]),
    reg!(RegisterRole::General(5), RegisterSlot::Gpr(5), 32, ["r5", "v2"]),
    reg!(RegisterRole::General(6), RegisterSlot::Gpr(6), 32, ["r6", "v3"]),
    reg!(RegisterRole::General(7), RegisterSlot::Gpr(7), 32, ["r7", "v4"]),
    reg!(RegisterRole::General(8), RegisterSlot::Gpr(8), 32, ["r8", "v5"]),
    reg!(RegisterRole::General(9), RegisterSlot::Gpr(9), 32, ["r9", "sb", "v6"]),
    reg!(RegisterRole::General(10), RegisterSlot::Gpr(10), 32, ["r10", "sl", "v7"]),
    reg!(RegisterRole::FramePointer, RegisterSlot::Gpr(11), 32, ["r11", "fp", "v8"]),
    reg!(RegisterRole::General(12), RegisterSlot::Gpr(12), 32, ["r12", "ip"]),
    reg!(RegisterRole::StackPointer, RegisterSlot::Gpr(13), 32, ["sp", "r13"]),
    reg!(RegisterRole::LinkRegister, RegisterSlot::Gpr(14), 32, ["lr", "r14"]),
    reg!(RegisterRole::InstructionPointer, RegisterSlot::Gpr(15), 32, ["pc", "r15"]),
    reg!(RegisterRole::Flags, RegisterSlot::Flags, 32, ["cpsr"]),
    reg!(RegisterRole::Vector(0), RegisterSlot::Vector(0), 64, ["d0"]),
    reg!(RegisterRole::Vector(1), RegisterSlot::Vector(1), 64, ["d1"]),
    reg!(RegisterRole::Vector(2), RegisterSlot::Vector(2), 64, ["d2"]),
    reg!(RegisterRole::Vector(3), RegisterSlot::Vector(3), 64, ["d3"]),
    reg!(RegisterRole::Vector(4), RegisterSlot::Vector(4), 64, ["d4"]),
    reg!(RegisterRole::Vector(5), RegisterSlot::Vector(5), 64, ["d5"]),
    reg!(RegisterRole::Vector(6), RegisterSlot::Vector(6), 64, ["d6"]),
    reg!(RegisterRole::Vector(7), RegisterSlot::Vector(7), 64, ["d7"]),
    reg!(RegisterRole::Vector(8), RegisterSlot::Vector(8), 64, ["d8"]),
    reg!(RegisterRole::Vector(9), RegisterSlot::Vector(9), 64, ["d9"]),
    reg!(RegisterRole::Vector(10), RegisterSlot::Vector(10), 64, ["d10"]),
    reg!(RegisterRole::Vector(11), RegisterSlot::Vector(11), 64, ["d11"]),
    reg!(RegisterRole::Vector(12), RegisterSlot::Vector(12), 64, ["d12"]),
    reg!(RegisterRole::Vector(13), RegisterSlot::Vector(13), 64, ["d13"]),
    reg!(RegisterRole::Vector(14), RegisterSlot::Vector(14), 64, ["d14"]),
    reg!(RegisterRole::Vector(15), RegisterSlot::Vector(15), 64, ["d15"]),
    reg!(RegisterRole::Vector(16), RegisterSlot::Vector(16), 64, ["d16"]),
    reg!(RegisterRole::Vector(17), RegisterSlot::Vector(17), 64, ["d17"]),
    reg!(RegisterRole::Vector(18), RegisterSlot::Vector(18), 64, ["d18"]),
    reg!(RegisterRole::Vector(19), RegisterSlot::Vector(19), 64, ["d19"]),
    reg!(RegisterRole::Vector(20), RegisterSlot::Vector(20), 64, ["d20"]),
    reg!(RegisterRole::Vector(21), RegisterSlot::Vector(21), 64, ["d21"]),
    reg!(RegisterRole::Vector(22), RegisterSlot::Vector(22), 64, ["d22"]),
    reg!(RegisterRole::Vector(23), RegisterSlot::Vector(23), 64, ["d23"]),
    reg!(RegisterRole::Vector(24), RegisterSlot::Vector(24), 64, ["d24"]),
    reg!(RegisterRole::Vector(25), RegisterSlot::Vector(25), 64, ["d25"]),
    reg!(RegisterRole::Vector(26), RegisterSlot::Vector(26), 64, ["d26"]),
    reg!(RegisterRole::Vector(27), RegisterSlot::Vector(27), 64, ["d27"]),
    reg!(RegisterRole::Vector(28), RegisterSlot::Vector(28), 64, ["d28"]),
    reg!(RegisterRole::Vector(29), RegisterSlot::Vector(29), 64, ["d29"]),
    reg!(RegisterRole::Vector(30), RegisterSlot::Vector(30), 64, ["d30"]),
    reg!(RegisterRole::Vector(31), RegisterSlot::Vector(31), 64, ["d31"]),
    reg!(RegisterRole::FloatStatus, RegisterSlot::FloatStatus, 32, ["fpscr"]),
];

/// AArch32: `r0`-`r15` with their APCS names (`a1`-`a4`, `v1`-`v8`, `sb`, `sl`,
/// `fp`, `ip`), `cpsr`, the VFP `d0`-`d31` bank and `fpscr`.
pub static ARM: RegisterAliasTable =
    RegisterAliasTable::new(Architecture::Arm, 16, 32, 32, 64, ARM_REGISTERS);

const ARM64_REGISTERS: &[RegisterDef] = &[
    reg!(RegisterRole::General(0), RegisterSlot::Gpr(0), 64, ["x0"]),
    reg!(RegisterRole::General(1), RegisterSlot::Gpr(1), 64, ["x1"]),
    reg!(RegisterRole::General(2), RegisterSlot::Gpr(2), 64, ["x2"]),
    reg!(RegisterRole::General(3), RegisterSlot::Gpr(3), 64, ["x3"]),
    reg!(RegisterRole::General(4), RegisterSlot::Gpr(4), 64, ["x4"]),
    reg!(RegisterRole::General(5), RegisterSlot::Gpr(5), 64, ["x5"]),
    reg!(RegisterRole::General(6), RegisterSlot::Gpr(6), 64, ["x6"]),
    reg!(RegisterRole::General(7), RegisterSlot::Gpr(7), 64, ["x7"]),
    reg!(RegisterRole::General(8), RegisterSlot::Gpr(8), 64, ["x8"]),
    reg!(RegisterRole::General(9), RegisterSlot::Gpr(9), 64, ["x9"]),
    reg!(RegisterRole::General(10), RegisterSlot::Gpr(10), 64, ["x10"]),
    reg!(RegisterRole::General(11), RegisterSlot::Gpr(11), 64, ["x11"]),
    reg!(RegisterRole::General(12), RegisterSlot::Gpr(12), 64, ["x12"]),
    reg!(RegisterRole::General(13), RegisterSlot::Gpr(13), 64, ["x13"]),
    reg!(RegisterRole::General(14), RegisterSlot::Gpr(14), 64, ["x14"]),
    reg!(RegisterRole::General(15), RegisterSlot::Gpr(15), 64, ["x15"]),
    reg!(RegisterRole::General(16), RegisterSlot::Gpr(16), 64, ["x16"]),
    reg!(RegisterRole::General(17), RegisterSlot::Gpr(17), 64, ["x17"]),
    reg!(RegisterRole::General(18), RegisterSlot::Gpr(18), 64, ["x18"]),
    reg!(RegisterRole::General(19), RegisterSlot::Gpr(19), 64, ["x19"]),
    reg!(RegisterRole::General(20), RegisterSlot::Gpr(20), 64, ["x20"]),
    reg!(RegisterRole::General(21), RegisterSlot::Gpr(21), 64, ["x21"]),
    reg!(RegisterRole::General(22), RegisterSlot::Gpr(22), 64, ["x22"]),
    reg!(RegisterRole::General(23), RegisterSlot::Gpr(23), 64, ["x23"]),
    reg!(RegisterRole::General(24), RegisterSlot::Gpr(24), 64, ["x24"]),
    reg!(RegisterRole::General(25), RegisterSlot::Gpr(25), 64, ["x25"]),
    reg!(RegisterRole::General(26), RegisterSlot::Gpr(26), 64, ["x26"]),
    reg!(RegisterRole::General(27), RegisterSlot::Gpr(27), 64, ["x27"]),
    reg!(RegisterRole::General(28), RegisterSlot::Gpr(28), 64, ["x28"]),
    reg!(RegisterRole::FramePointer, RegisterSlot::Gpr(29), 64, ["x29", "fp"]),
    reg!(RegisterRole::LinkRegister, RegisterSlot::Gpr(30), 64, ["x30", "lr"]),
    reg!(RegisterRole::StackPointer, RegisterSlot::Gpr(31), 64, ["sp"]),
    reg!(RegisterRole::InstructionPointer, RegisterSlot::Gpr(32), 64, ["pc"]),
    reg!(RegisterRole::Flags, RegisterSlot::Flags, 64, ["pstate", "cpsr"]),
    reg!(RegisterRole::Vector(0), RegisterSlot::Vector(0), 128, ["v0", "q0"]),
    reg!(RegisterRole::Vector(1), RegisterSlot::Vector(1), 128, ["v1", "q1"]),
    reg!(RegisterRole::Vector(2), RegisterSlot::Vector(2), 128, ["v2", "q2"]),
    reg!(RegisterRole::Vector(3), RegisterSlot::Vector(3), 128, ["v3", "q3"]),
    reg!(RegisterRole::Vector(4), RegisterSlot::Vector(4), 128, ["v4", "q4"]),
    reg!(RegisterRole::Vector(5), RegisterSlot::Vector(5), 128, ["v5", "q5"]),
    reg!(RegisterRole::Vector(6), RegisterSlot::Vector(6), 128, ["v6", "q6"]),
    reg!(RegisterRole::Vector(7), RegisterSlot::Vector(7), 128, ["v7", "q7"]),
    reg!(RegisterRole::Vector(8), RegisterSlot::Vector(8), 128, ["v8", "q8"]),
    reg!(RegisterRole::Vector(9), RegisterSlot::Vector(9), 128, ["v9", "q9"]),
    reg!(RegisterRole::Vector(10), RegisterSlot::Vector(10), 128, ["v10", "q10"]),
    reg!(RegisterRole::Vector(11), RegisterSlot::Vector(11), 128, ["v11", "q11"]),
    reg!(RegisterRole::Vector(12), RegisterSlot::Vector(12), 128, ["v12", "q12"]),
    reg!(RegisterRole::Vector(13), RegisterSlot::Vector(13), 128, ["v13", "q13"]),
    reg!(RegisterRole::Vector(14), RegisterSlot::Vector(14), 128, ["v14", "q14"]),
    reg!(RegisterRole::Vector(15), RegisterSlot::Vector(15), 128, ["v15", "q15"]),
    reg!(RegisterRole::Vector(16), RegisterSlot::Vector(16), 128, ["v16", "q16"]),
    reg!(RegisterRole::Vector(17), RegisterSlot::Vector(17), 128, ["v17", "q17"]),
    reg!(RegisterRole::Vector(18), RegisterSlot::Vector(18), 128, ["v18", "q18"]),
    reg!(RegisterRole::Vector(19), RegisterSlot::Vector(19), 128, ["v19", "q19"]),
    reg!(RegisterRole::Vector(20), RegisterSlot::Vector(20), 128, ["v20", "q20"]),
    reg!(RegisterRole::Vector(21), RegisterSlot::Vector(21), 128, ["v21", "q21"]),
    reg!(RegisterRole::Vector(22), RegisterSlot::Vector(22), 128, ["v22", "q22"]),
    reg!(RegisterRole::Vector(23), RegisterSlot::Vector(23), 128, ["v23", "q23"]),
    reg!(RegisterRole::Vector(24), RegisterSlot::Vector(24), 128, ["v24", "q24"]),
    reg!(RegisterRole::Vector(25), RegisterSlot::Vector(25), 128, ["v25", "q25"]),
    reg!(RegisterRole::Vector(26), RegisterSlot::Vector(26), 128, ["v26", "q26"]),
    reg!(RegisterRole::Vector(27), RegisterSlot::Vector(27), 128, ["v27", "q27"]),
    reg!(RegisterRole::Vector(28), RegisterSlot::Vector(28), 128, ["v28", "q28"]),
    reg!(RegisterRole::Vector(29), RegisterSlot::Vector(29), 128, ["v29", "q29"]),
    reg!(RegisterRole::Vector(30), RegisterSlot::Vector(30), 128, ["v30", "q30"]),
    reg!(RegisterRole::Vector(31), RegisterSlot::Vector(31), 128, ["v31", "q31"]),
    reg!(RegisterRole::FloatStatus, RegisterSlot::FloatStatus, 32, ["fpsr"]),
];

/// AArch64: `x0`-`x30` (`fp`, `lr`), `sp`, `pc`, `pstate` (also `cpsr`),
/// `v0`-`v31` (also `q0`-`q31`) and `fpsr`.
pub static ARM64: RegisterAliasTable =
    RegisterAliasTable::new(Architecture::Arm64, 33, 64, 32, 128, ARM64_REGISTERS);
