//! Captured register state of one thread.

use smallvec::SmallVec;

use super::{flags, RegisterAliasTable, RegisterBlock, RegisterDef, RegisterRole, RegisterSlot, RegisterValue, VectorRegisterValue};
use crate::error::{CoreError, CoreResult};
use crate::raw::{ContextBlock, RawContext};
use crate::types::{Address, Architecture};

/// Value held by every slot of an unfilled block, and written to every field
/// of a raw context whose block is unfilled (all bits set).

pub const REGISTER_SENTINEL: u64 = u64::MAX;

/// Canonical contents of the general-purpose block
///
/// `values` is indexed by [`RegisterSlot::Gpr`] and always holds exactly
/// [`RegisterAliasTable::gpr_count`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralState
{
    /// General-purpose slots in table order
    pub values: SmallVec<[u64; 32]>,
    /// Flags / status register
    pub flags: u64,
    /// Raw fields with no named register (`orig_rax`, `orig_r0`, ...), in
    /// the order the raw layout defines
    pub extra: SmallVec<[u64; 2]>,
}

impl GeneralState
{
    /// A block of `count` slots with every bit set.
    pub fn sentinel(count: usize) -> Self
    {
        Self {
            values: SmallVec::from_elem(REGISTER_SENTINEL, count),
            flags: REGISTER_SENTINEL,
            extra: SmallVec::new(),
        }
    }

    /// Slot value, or the sentinel for an index outside the block.
    pub fn get(&self, index: usize) -> u64
    {
        self.values.get(index).copied().unwrap_or(REGISTER_SENTINEL)
    }

    /// Pass-through word `index`, or the sentinel if the block does not carry it.
    pub fn extra_word(&self, index: usize) -> u64
    {
        self.extra.get(index).copied().unwrap_or(REGISTER_SENTINEL)
    }
}

/// Canonical contents of the floating-point / vector block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorState
{
    /// Vector registers in table order
    pub registers: SmallVec<[VectorRegisterValue; 32]>,
    /// Floating-point status word
    pub status: u32,
    /// x87 stack `st0`-`st7` in 16-byte slots; empty on ARM
    pub x87: SmallVec<[VectorRegisterValue; 8]>,
    /// Raw fields with no named register (x87 control words, `fpcr`,
    /// reserved areas), as 32-bit words in the order the raw layout defines
    pub extra: Vec<u32>,
}

impl VectorState
{
    /// A block of `count` registers with every bit set.
    pub fn sentinel(count: usize) -> Self
    {
        Self {
            registers: SmallVec::from_elem(VectorRegisterValue::SENTINEL, count),
            status: u32::MAX,
            x87: SmallVec::new(),
            extra: Vec::new(),
        }
    }

    /// Register value, or the sentinel for an index outside the block.
    pub fn get(&self, index: usize) -> VectorRegisterValue
    {
        self.registers.get(index).copied().unwrap_or(VectorRegisterValue::SENTINEL)
    }

    /// x87 stack register `st(index)`, or the sentinel if absent.
    pub fn x87_register(&self, index: usize) -> VectorRegisterValue
    {
        self.x87.get(index).copied().unwrap_or(VectorRegisterValue::SENTINEL)
    }

    /// Pass-through word `index`, or all-ones if the block does not carry it.
    pub fn extra_word(&self, index: usize) -> u32
    {
        self.extra.get(index).copied().unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Block<S>
{
    state: S,
    filled: bool,
}

/// Snapshot of a thread's registers
///
/// Holds a general-purpose block (GPRs and flags) and a floating-point /
/// vector block, each with its own "filled" flag. Every query is resolved
/// through the architecture's [`RegisterAliasTable`]; nothing here is
/// specific to one CPU.
///
/// A `RegisterFile` is a plain value. `clone()` produces an independent deep
/// copy, and a snapshot handed to the unwinder cannot be affected by later
/// changes to the live thread.
///
/// ## Availability
///
/// A register is only reported when its block is filled. Querying an
/// unfilled block, or a name no alias matches, yields `None`; there is no
/// way to observe the placeholder contents of an unfilled block through the
/// named accessors.
///
/// ```rust
/// use stackscope_core::raw::x86_64::UserRegsX86_64;
/// use stackscope_core::registers::RegisterFile;
/// use stackscope_core::types::{Address, Architecture};
///
/// let mut regs = RegisterFile::new(Architecture::X86_64);
/// assert!(regs.stack_pointer().is_none());
///
/// let raw = UserRegsX86_64 { rsp: 0x7ffe_0000, rbp: 0x7ffe_0040, ..Default::default() };
/// regs.fill(&raw).unwrap();
///
/// assert_eq!(regs.stack_pointer(), Some(Address::from(0x7ffe_0000)));
/// assert_eq!(regs.lookup("RBP").map(|v| v.as_u64()), Some(0x7ffe_0040));
/// assert!(regs.lookup("xmm0").is_none()); // vector block not filled
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile
{
    architecture: Architecture,
    general: Block<GeneralState>,
    vector: Block<VectorState>,
}

impl RegisterFile
{
    /// Create an empty (all-unfilled) register file for `architecture`.
    pub fn new(architecture: Architecture) -> Self
    {
        let table = architecture.register_table();
        Self {
            architecture,
            general: Block {
                state: GeneralState::sentinel(table.gpr_count()),
                filled: false,
            },
            vector: Block {
                state: VectorState::sentinel(table.vector_count()),
                filled: false,
            },
        }
    }

    /// Architecture of this snapshot.
    pub fn architecture(&self) -> Architecture
    {
        self.architecture
    }

    /// Alias table used to resolve names.
    pub fn table(&self) -> &'static RegisterAliasTable
    {
        self.architecture.register_table()
    }

    /// Reset both blocks to the unfilled state.
    pub fn clear(&mut self)
    {
        *self = Self::new(self.architecture);
    }

    /// `true` when the general-purpose block holds no captured state.
    pub fn is_empty(&self) -> bool
    {
        !self.general.filled
    }

    /// Whether `block` holds captured state.
    pub fn is_filled(&self, block: RegisterBlock) -> bool
    {
        match block {
            RegisterBlock::General => self.general.filled,
            RegisterBlock::Vector => self.vector.filled,
        }
    }

    /// Contents of the general-purpose block, if filled.
    pub fn general_state(&self) -> Option<&GeneralState>
    {
        self.general.filled.then_some(&self.general.state)
    }

    /// Contents of the floating-point / vector block, if filled.
    pub fn vector_state(&self) -> Option<&VectorState>
    {
        self.vector.filled.then_some(&self.vector.state)
    }

    /// Copy a raw hardware context into the canonical slots.
    ///
    /// Only the blocks the context carries are filled: a GPR-only context
    /// leaves the vector block untouched (and vice versa). A pair
    /// `(gpr, fpu)` fills both.
    ///
    /// ## Errors
    ///
    /// [`CoreError::ArchitectureMismatch`] if the context belongs to another
    /// architecture. The register file is left unchanged.
    pub fn fill<C: RawContext>(&mut self, raw: &C) -> CoreResult<()>
    {
        self.check_architecture(C::ARCHITECTURE)?;

        let table = self.table();
        for block in raw.blocks() {
            match block {
                ContextBlock::General(mut state) => {
                    state.values.resize(table.gpr_count(), REGISTER_SENTINEL);
                    self.general = Block { state, filled: true };
                }
                ContextBlock::Vector(mut state) => {
                    state.registers.resize(table.vector_count(), VectorRegisterValue::SENTINEL);
                    self.vector = Block { state, filled: true };
                }
            }
        }
        Ok(())
    }

    /// Produce a raw hardware context from the canonical slots.
    ///
    /// The inverse of [`fill`](Self::fill): raw fields with no named register
    /// are carried through the block unchanged. Every field of an unfilled
    /// block is set to all-ones.
    ///
    /// ## Errors
    ///
    /// [`CoreError::ArchitectureMismatch`] if `C` belongs to another architecture.
    pub fn to_raw<C: RawContext>(&self) -> CoreResult<C>
    {
        self.check_architecture(C::ARCHITECTURE)?;
        Ok(C::from_register_file(self))
    }

    /// Look up a register by any of its names (case-insensitive).
    ///
    /// Returns `None` for unknown names and for registers whose block is not
    /// filled.
    pub fn lookup(&self, name: &str) -> Option<RegisterValue>
    {
        let def = self.table().resolve(name)?;
        self.read(def)
    }

    /// Look up the register playing `role`.
    pub fn by_role(&self, role: RegisterRole) -> Option<RegisterValue>
    {
        let def = self.table().by_role(role)?;
        self.read(def)
    }

    /// General-purpose slot `n` under its canonical name.
    pub fn gp_register(&self, n: usize) -> Option<RegisterValue>
    {
        let slot = RegisterSlot::Gpr(u8::try_from(n).ok()?);
        let def = self.table().by_slot(slot)?;
        self.read(def)
    }

    /// Write a register by any of its names (case-insensitive).
    ///
    /// The value is truncated to the register's width.
    ///
    /// ## Errors
    ///
    /// - [`CoreError::UnknownRegister`] if no alias matches `name`.
    /// - [`CoreError::RegisterUnavailable`] if the register's block is not
    ///   filled. Writing never marks a block as filled.
    pub fn set(&mut self, name: &str, value: impl Into<u128>) -> CoreResult<()>
    {
        let def = self
            .table()
            .resolve(name)
            .ok_or_else(|| CoreError::UnknownRegister(name.to_string()))?;
        self.write(def, value.into())
    }

    /// Write the register playing `role`.
    ///
    /// ## Errors
    ///
    /// As for [`set`](Self::set); an architecture without the role reports
    /// [`CoreError::UnknownRegister`].
    pub fn set_role(&mut self, role: RegisterRole, value: impl Into<u128>) -> CoreResult<()>
    {
        let def = self
            .table()
            .by_role(role)
            .ok_or_else(|| CoreError::UnknownRegister(format!("{role:?}")))?;
        self.write(def, value.into())
    }

    /// Current instruction pointer, `None` if the general block is unfilled.
    pub fn instruction_pointer(&self) -> Option<Address>
    {
        self.by_role(RegisterRole::InstructionPointer).map(|v| v.as_address())
    }

    /// Current stack pointer, `None` if the general block is unfilled.
    pub fn stack_pointer(&self) -> Option<Address>
    {
        self.by_role(RegisterRole::StackPointer).map(|v| v.as_address())
    }

    /// Current frame pointer, `None` if the general block is unfilled.
    pub fn frame_pointer(&self) -> Option<Address>
    {
        self.by_role(RegisterRole::FramePointer).map(|v| v.as_address())
    }

    /// Flags / status register, `None` if the general block is unfilled.
    pub fn flags(&self) -> Option<u64>
    {
        self.by_role(RegisterRole::Flags).map(|v| v.as_u64())
    }

    /// Set the instruction pointer.
    ///
    /// ## Errors
    ///
    /// [`CoreError::RegisterUnavailable`] if the general block is unfilled.
    pub fn set_instruction_pointer(&mut self, address: Address) -> CoreResult<()>
    {
        self.set_role(RegisterRole::InstructionPointer, address.value())
    }

    /// Set the flags / status register.
    ///
    /// ## Errors
    ///
    /// [`CoreError::RegisterUnavailable`] if the general block is unfilled.
    pub fn set_flags(&mut self, value: u64) -> CoreResult<()>
    {
        self.set_role(RegisterRole::Flags, value)
    }

    /// Move the stack pointer by `delta` bytes and return its new value.
    ///
    /// The result wraps within the register's width, as the hardware would.
    ///
    /// ## Errors
    ///
    /// [`CoreError::RegisterUnavailable`] if the general block is unfilled.
    pub fn adjust_stack(&mut self, delta: i64) -> CoreResult<Address>
    {
        let current = self
            .by_role(RegisterRole::StackPointer)
            .ok_or_else(|| CoreError::RegisterUnavailable(self.role_name(RegisterRole::StackPointer)))?;
        let updated = current.as_u64().wrapping_add_signed(delta);
        self.set_role(RegisterRole::StackPointer, updated)?;
        // Re-read so the caller sees the width-truncated value.
        self.stack_pointer()
            .ok_or_else(|| CoreError::RegisterUnavailable(self.role_name(RegisterRole::StackPointer)))
    }

    /// Every available register in table order.
    ///
    /// Registers of unfilled blocks are skipped, so an empty register file
    /// yields nothing.
    pub fn registers(&self) -> impl Iterator<Item = RegisterValue> + '_
    {
        self.table().registers().iter().filter_map(move |def| self.read(def))
    }

    /// Human-readable decoding of the flags register, e.g. `"ZF PF IF"` or
    /// `"N C (user)"`. `None` if the general block is unfilled.
    pub fn flags_description(&self) -> Option<String>
    {
        self.flags().map(|value| flags::describe(self.architecture, value))
    }

    fn read(&self, def: &RegisterDef) -> Option<RegisterValue>
    {
        if !self.is_filled(def.slot.block()) {
            return None;
        }

        let raw = match def.slot {
            RegisterSlot::Gpr(index) => u128::from(self.general.state.get(usize::from(index))),
            RegisterSlot::Flags => u128::from(self.general.state.flags),
            RegisterSlot::Vector(index) => self.vector.state.get(usize::from(index)).as_u128(),
            RegisterSlot::FloatStatus => u128::from(self.vector.state.status),
            RegisterSlot::X87(index) => self.vector.state.x87_register(usize::from(index)).as_u128(),
        };
        Some(RegisterValue::new(def, raw))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write(&mut self, def: &RegisterDef, value: u128) -> CoreResult<()>
    {
        if !self.is_filled(def.slot.block()) {
            return Err(CoreError::RegisterUnavailable(def.canonical_name().to_string()));
        }

        let value = value & def.mask();
        match def.slot {
            RegisterSlot::Gpr(index) => {
                let slot = self
                    .general
                    .state
                    .values
                    .get_mut(usize::from(index))
                    .ok_or_else(|| CoreError::UnknownRegister(def.canonical_name().to_string()))?;
                *slot = value as u64;
            }
            RegisterSlot::Flags => self.general.state.flags = value as u64,
            RegisterSlot::Vector(index) => {
                let slot = self
                    .vector
                    .state
                    .registers
                    .get_mut(usize::from(index))
                    .ok_or_else(|| CoreError::UnknownRegister(def.canonical_name().to_string()))?;
                *slot = VectorRegisterValue::from_u128(value);
            }
            RegisterSlot::FloatStatus => self.vector.state.status = value as u32,
            RegisterSlot::X87(index) => {
                let slot = self
                    .vector
                    .state
                    .x87
                    .get_mut(usize::from(index))
                    .ok_or_else(|| CoreError::RegisterUnavailable(def.canonical_name().to_string()))?;
                // bytes above the 80-bit value are reserved and kept as captured
                *slot = VectorRegisterValue::from_u128((slot.as_u128() & !def.mask()) | value);
            }
        }
        Ok(())
    }

    fn role_name(&self, role: RegisterRole) -> String
    {
        self.table()
            .by_role(role)
            .map_or_else(|| format!("{role:?}"), |def| def.canonical_name().to_string())
    }

    fn check_architecture(&self, found: Architecture) -> CoreResult<()>
    {
        if found == self.architecture {
            Ok(())
        } else {
            Err(CoreError::ArchitectureMismatch {
                expected: self.architecture,
                found,
            })
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::raw::arm64::{UserFpsimdArm64, UserPtRegsArm64};

    fn filled_arm64() -> RegisterFile
    {
        let mut raw = UserPtRegsArm64::default();
        for (i, reg) in raw.regs.iter_mut().enumerate() {
            *reg = 0x1000 + i as u64;
        }
        raw.sp = 0x7fff_fff0;
        raw.pc = 0x40_0000;
        raw.pstate = 0x6000_0000;

        let mut regs = RegisterFile::new(Architecture::Arm64);
        regs.fill(&raw).unwrap();
        regs
    }

    #[test]
    fn test_new_register_file_is_empty()
    {
        let regs = RegisterFile::new(Architecture::Arm64);
        assert!(regs.is_empty());
        assert!(!regs.is_filled(RegisterBlock::Vector));
        assert_eq!(regs.registers().count(), 0);
    }

    #[test]
    fn test_clear_resets_both_blocks()
    {
        let mut regs = filled_arm64();
        regs.fill(&UserFpsimdArm64::default()).unwrap();
        regs.clear();
        assert!(regs.is_empty());
        assert!(regs.vector_state().is_none());
        assert_eq!(regs, RegisterFile::new(Architecture::Arm64));
    }

    #[test]
    fn test_gp_register_uses_canonical_name()
    {
        let regs = filled_arm64();
        let fp = regs.gp_register(29).unwrap();
        assert_eq!(fp.name(), "x29");
        assert_eq!(fp.role(), RegisterRole::FramePointer);
        assert_eq!(fp.as_u64(), 0x1000 + 29);
        assert!(regs.gp_register(200).is_none());
        assert!(regs.gp_register(1000).is_none());
    }

    #[test]
    fn test_set_is_truncated_to_width()
    {
        let mut regs = RegisterFile::new(Architecture::X86);
        regs.fill(&crate::raw::x86::UserRegsX86::default()).unwrap();
        regs.set("eax", 0x1_2345_6789u64).unwrap();
        assert_eq!(regs.lookup("eax").unwrap().as_u64(), 0x2345_6789);
    }

    #[test]
    fn test_adjust_stack_moves_both_directions()
    {
        let mut regs = filled_arm64();
        assert_eq!(regs.adjust_stack(-16).unwrap(), Address::from(0x7fff_ffe0));
        assert_eq!(regs.adjust_stack(32).unwrap(), Address::from(0x8000_0000));
    }

    #[test]
    fn test_adjust_stack_requires_filled_block()
    {
        let mut regs = RegisterFile::new(Architecture::X86_64);
        assert!(matches!(regs.adjust_stack(8), Err(CoreError::RegisterUnavailable(name)) if name == "rsp"));
    }

    #[test]
    fn test_registers_lists_general_block_only()
    {
        let regs = filled_arm64();
        let names: Vec<_> = regs.registers().map(|v| v.name()).collect();
        assert_eq!(names.len(), 34); // x0-x30, sp, pc, pstate
        assert_eq!(names.first(), Some(&"x0"));
        assert!(names.contains(&"pstate"));
        assert!(!names.contains(&"v0"));
    }
}
