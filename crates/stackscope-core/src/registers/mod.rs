//! # Registers
//!
//! Architecture-independent register model.
//!
//! A [`RegisterAliasTable`] describes, as static data, every register an
//! architecture exposes: the semantic [`RegisterRole`] it plays, the
//! [`RegisterSlot`] its value lives in, its width, and each name it is known
//! by. A [`RegisterFile`] holds one captured snapshot and answers every query
//! through the table, so supporting a new CPU means adding a table and a raw
//! context layout, never new lookup code.
//!
//! ## Example
//!
//! ```rust
//! use stackscope_core::raw::arm::UserRegsArm;
//! use stackscope_core::registers::RegisterFile;
//! use stackscope_core::types::Architecture;
//!
//! let mut raw = UserRegsArm::default();
//! raw.uregs[9] = 0x1234;
//!
//! let mut regs = RegisterFile::new(Architecture::Arm);
//! regs.fill(&raw).unwrap();
//!
//! // r9 is also known as sb and v6
//! for name in ["r9", "SB", "v6"] {
//!     assert_eq!(regs.lookup(name).map(|v| v.as_u64()), Some(0x1234));
//! }
//! ```

mod file;
pub mod flags;
pub mod float;
pub mod tables;

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;

pub use file::{GeneralState, RegisterFile, VectorState, REGISTER_SENTINEL};

use self::float::FloatClass;
use crate::types::{Address, Architecture};

/// Semantic role of a register
///
/// Roles are what callers ask for when they do not care how a CPU names a
/// register ("give me the stack pointer"). Not every architecture populates
/// every role: only ARM has a [`LinkRegister`](RegisterRole::LinkRegister),
/// only x86 has segment registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterRole
{
    /// General-purpose register by hardware number
    General(u8),
    /// Stack pointer (`rsp`, `esp`, `sp`)
    StackPointer,
    /// Frame pointer (`rbp`, `ebp`, `r11`, `x29`)
    FramePointer,
    /// Instruction pointer (`rip`, `eip`, `pc`)
    InstructionPointer,
    /// Link register holding the return address (`lr`)
    LinkRegister,
    /// Flags / status register (`rflags`, `eflags`, `cpsr`, `pstate`)
    Flags,
    /// x86 segment selector (`cs`, `ss`, `ds`, `es`, `fs`, `gs`)
    Segment(u8),
    /// x86-64 segment base (`fs_base`, `gs_base`)
    SegmentBase(u8),
    /// Floating-point / SIMD register by number
    Vector(u8),
    /// Floating-point status word (`mxcsr`, `fpscr`, `fpsr`)
    FloatStatus,
    /// x87 stack register `st(n)`
    X87(u8),
}

/// Which independently-validated block of a [`RegisterFile`] a slot lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterBlock
{
    /// General-purpose registers and flags
    General,
    /// Floating-point / vector registers and their status word
    Vector,
}

/// Storage location of a register value inside a [`RegisterFile`]
///
/// Several roles can share a slot's block but each slot belongs to exactly
/// one table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterSlot
{
    /// Index into the general-purpose array
    Gpr(u8),
    /// The flags value of the general block
    Flags,
    /// Index into the vector register array
    Vector(u8),
    /// The status word of the vector block
    FloatStatus,
    /// Index into the x87 stack of the vector block
    X87(u8),
}

impl RegisterSlot
{
    /// The block that must be filled for this slot to hold real data.
    pub const fn block(self) -> RegisterBlock
    {
        match self {
            RegisterSlot::Gpr(_) | RegisterSlot::Flags => RegisterBlock::General,
            RegisterSlot::Vector(_) | RegisterSlot::FloatStatus | RegisterSlot::X87(_) => RegisterBlock::Vector,
        }
    }
}

/// One entry of a [`RegisterAliasTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDef
{
    /// Semantic role of the register
    pub role: RegisterRole,
    /// Where the value is stored
    pub slot: RegisterSlot,
    /// Width of the register in bits
    pub bits: u16,
    /// Accepted names, lowercase; the first is canonical
    pub names: &'static [&'static str],
}

impl RegisterDef
{
    /// Canonical (preferred) name of the register.
    pub fn canonical_name(&self) -> &'static str
    {
        self.names.first().copied().unwrap_or("")
    }

    /// Mask selecting the bits this register actually holds.
    pub const fn mask(&self) -> u128
    {
        if self.bits >= 128 {
            u128::MAX
        } else {
            (1u128 << self.bits) - 1
        }
    }
}

/// Static description of one architecture's registers
///
/// One instance exists per supported architecture (see
/// [`Architecture::register_table`]); it is read-only for the life of the
/// process. Name resolution goes through an index built on first use.
pub struct RegisterAliasTable
{
    architecture: Architecture,
    gpr_count: usize,
    gpr_bits: u16,
    vector_count: usize,
    vector_bits: u16,
    registers: &'static [RegisterDef],
    index: OnceCell<HashMap<&'static str, usize>>,
}

impl RegisterAliasTable
{
    pub(crate) const fn new(
        architecture: Architecture,
        gpr_count: usize,
        gpr_bits: u16,
        vector_count: usize,
        vector_bits: u16,
        registers: &'static [RegisterDef],
    ) -> Self
    {
        Self {
            architecture,
            gpr_count,
            gpr_bits,
            vector_count,
            vector_bits,
            registers,
            index: OnceCell::new(),
        }
    }

    /// Architecture this table describes.
    pub fn architecture(&self) -> Architecture
    {
        self.architecture
    }

    /// Number of slots in the general-purpose array.
    pub fn gpr_count(&self) -> usize
    {
        self.gpr_count
    }

    /// Natural width of a general-purpose register.
    pub fn gpr_bits(&self) -> u16
    {
        self.gpr_bits
    }

    /// Number of floating-point / vector registers.
    pub fn vector_count(&self) -> usize
    {
        self.vector_count
    }

    /// Width of one floating-point / vector register.
    pub fn vector_bits(&self) -> u16
    {
        self.vector_bits
    }

    /// Every register, in table order.
    pub fn registers(&self) -> &'static [RegisterDef]
    {
        self.registers
    }

    /// Resolve a register name, case-insensitively, against every alias.
    ///
    /// ```rust
    /// use stackscope_core::registers::RegisterRole;
    /// use stackscope_core::types::Architecture;
    ///
    /// let table = Architecture::Arm64.register_table();
    /// assert_eq!(table.resolve("FP").map(|d| d.role), Some(RegisterRole::FramePointer));
    /// assert_eq!(table.resolve("x29").map(|d| d.role), Some(RegisterRole::FramePointer));
    /// assert!(table.resolve("rbp").is_none());
    /// ```
    pub fn resolve(&self, name: &str) -> Option<&'static RegisterDef>
    {
        let registers = self.registers;
        let index = self.index.get_or_init(|| {
            registers
                .iter()
                .enumerate()
                .flat_map(|(position, def)| def.names.iter().map(move |name| (*name, position)))
                .collect()
        });

        let folded = name.trim().to_ascii_lowercase();
        index.get(folded.as_str()).map(|&position| &registers[position])
    }

    /// Find the register playing `role`, if this architecture has one.
    pub fn by_role(&self, role: RegisterRole) -> Option<&'static RegisterDef>
    {
        self.registers.iter().find(|def| def.role == role)
    }

    /// Find the register stored in `slot`.
    pub fn by_slot(&self, slot: RegisterSlot) -> Option<&'static RegisterDef>
    {
        self.registers.iter().find(|def| def.slot == slot)
    }
}

impl fmt::Debug for RegisterAliasTable
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("RegisterAliasTable")
            .field("architecture", &self.architecture)
            .field("gpr_count", &self.gpr_count)
            .field("vector_count", &self.vector_count)
            .field("registers", &self.registers.len())
            .finish()
    }
}

/// 128-bit SIMD register value.
///
/// Stored little-endian: `bytes[0]` is the least significant byte. Narrower
/// banks (ARM `d0`-`d31`) use the low bytes and leave the rest zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct VectorRegisterValue
{
    bytes: [u8; 16],
}

impl VectorRegisterValue
{
    /// All bits set; the contents of an unfilled vector block.
    pub const SENTINEL: Self = Self { bytes: [0xff; 16] };

    /// Create a new vector register from raw bytes (little-endian).
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self
    {
        Self { bytes }
    }

    /// Create a vector register from a 128-bit integer (little-endian).
    #[must_use]
    pub const fn from_u128(value: u128) -> Self
    {
        Self {
            bytes: value.to_le_bytes(),
        }
    }

    /// Access the raw bytes of the vector register.
    #[must_use]
    pub const fn bytes(&self) -> &[u8; 16]
    {
        &self.bytes
    }

    /// Convert to a 128-bit integer (little-endian).
    #[must_use]
    pub const fn as_u128(&self) -> u128
    {
        u128::from_le_bytes(self.bytes)
    }
}

/// A register value read from a [`RegisterFile`]
///
/// Carries the canonical name and role of the register that produced it, so
/// a lookup through any alias yields the same, comparable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterValue
{
    name: &'static str,
    role: RegisterRole,
    bits: u16,
    value: u128,
}

impl RegisterValue
{
    pub(crate) fn new(def: &RegisterDef, raw: u128) -> Self
    {
        Self {
            name: def.canonical_name(),
            role: def.role,
            bits: def.bits,
            value: raw & def.mask(),
        }
    }

    /// Canonical register name.
    pub fn name(&self) -> &'static str
    {
        self.name
    }

    /// Role of the register.
    pub fn role(&self) -> RegisterRole
    {
        self.role
    }

    /// Width in bits.
    pub fn bits(&self) -> u16
    {
        self.bits
    }

    /// Full value, zero-extended to 128 bits.
    pub fn value(&self) -> u128
    {
        self.value
    }

    /// Low 64 bits of the value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_u64(&self) -> u64
    {
        self.value as u64
    }

    /// The value interpreted as an address.
    pub fn as_address(&self) -> Address
    {
        Address::from(self.as_u64())
    }

    /// Class of the 80-bit value held by an x87 stack register.
    ///
    /// `None` for every other register.
    pub fn x87_class(&self) -> Option<FloatClass>
    {
        let RegisterRole::X87(_) = self.role else {
            return None;
        };
        let mut bytes = [0u8; 10];
        bytes.copy_from_slice(&self.value.to_le_bytes()[..10]);
        Some(float::classify_x87(&bytes))
    }
}

impl fmt::Display for RegisterValue
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let digits = usize::from(self.bits.div_ceil(4));
        write!(f, "{} = 0x{:0width$x}", self.name, self.value, width = digits)
    }
}
