//! # Raw Contexts
//!
//! `#[repr(C)]` mirrors of the register structures the Linux kernel exchanges
//! through `PTRACE_GETREGS` / `PTRACE_GETREGSET`, one module per
//! architecture.
//!
//! A raw context is nothing but a field-order descriptor: it knows which of
//! its fields feed which canonical slot of a [`RegisterFile`], and nothing
//! else. All naming, availability and width logic lives in the register file
//! and its alias table.
//!
//! ## Unfilled blocks and unmapped fields
//!
//! Fields with no named register (`orig_rax`, x87 control words, `fpcr`,
//! reserved areas) travel through the block's `extra` words, so
//! [`RegisterFile::to_raw`] returns exactly what [`RegisterFile::fill`] was
//! given. Every field of an unfilled block is written as all-ones; for
//! `orig_rax` / `orig_eax` / `orig_r0` this is also the value the kernel uses
//! for "not inside a system call".

pub mod arm;
pub mod arm64;
pub mod x86;
pub mod x86_64;

use smallvec::{smallvec, SmallVec};

use crate::registers::{GeneralState, RegisterFile, VectorRegisterValue, VectorState};
use crate::types::Architecture;

/// Canonical contents of one register block, produced by a raw context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextBlock
{
    /// General-purpose registers and flags
    General(GeneralState),
    /// Floating-point / vector registers and status word
    Vector(VectorState),
}

/// A raw hardware context of one architecture
///
/// Implemented by every structure in this module and by pairs `(gpr, fpu)`
/// of the same architecture, so a full thread capture can be filled in one
/// call.
pub trait RawContext: Sized
{
    /// Architecture this layout belongs to.
    const ARCHITECTURE: Architecture;

    /// Canonical blocks carried by this context.
    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>;

    /// Rebuild the raw structure from a register file of the same architecture.
    fn from_register_file(file: &RegisterFile) -> Self;
}

impl<G, V> RawContext for (G, V)
where
    G: RawContext,
    V: RawContext,
{
    const ARCHITECTURE: Architecture = G::ARCHITECTURE;

    fn blocks(&self) -> SmallVec<[ContextBlock; 2]>
    {
        debug_assert_eq!(G::ARCHITECTURE, V::ARCHITECTURE, "mixed-architecture context pair");
        let mut blocks = self.0.blocks();
        blocks.extend(self.1.blocks());
        blocks
    }

    fn from_register_file(file: &RegisterFile) -> Self
    {
        (G::from_register_file(file), V::from_register_file(file))
    }
}

pub(crate) fn general_block(values: &[u64], flags: u64, extra: &[u64]) -> SmallVec<[ContextBlock; 2]>
{
    smallvec![ContextBlock::General(GeneralState {
        values: SmallVec::from_slice(values),
        flags,
        extra: SmallVec::from_slice(extra),
    })]
}

pub(crate) fn vector_block(
    registers: impl IntoIterator<Item = u128>,
    status: u32,
    x87: impl IntoIterator<Item = u128>,
    extra: Vec<u32>,
) -> SmallVec<[ContextBlock; 2]>
{
    smallvec![ContextBlock::Vector(VectorState {
        registers: registers.into_iter().map(VectorRegisterValue::from_u128).collect(),
        status,
        x87: x87.into_iter().map(VectorRegisterValue::from_u128).collect(),
        extra,
    })]
}

/// Pack two 16-bit words into one 32-bit word, `low` first in memory.
pub(crate) fn pack_u16(low: u16, high: u16) -> u32
{
    u32::from(low) | (u32::from(high) << 16)
}

/// Split a 32-bit word into its low and high 16-bit halves.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn unpack_u16(word: u32) -> (u16, u16)
{
    (word as u16, (word >> 16) as u16)
}

/// Low 32 bits of a canonical slot, for 32-bit layouts.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn low32(value: u64) -> u32
{
    value as u32
}

/// Split a 128-bit lane into four little-endian `u32` words.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn split_u128(value: u128) -> [u32; 4]
{
    [value as u32, (value >> 32) as u32, (value >> 64) as u32, (value >> 96) as u32]
}

/// Join four little-endian `u32` words into a 128-bit lane.
pub(crate) fn join_u128(words: &[u32]) -> u128
{
    words
        .iter()
        .take(4)
        .enumerate()
        .fold(0u128, |acc, (i, word)| acc | (u128::from(*word) << (32 * i)))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_u128_split_join()
    {
        let value = 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210u128;
        let words = split_u128(value);
        assert_eq!(words[0], 0x7654_3210);
        assert_eq!(words[3], 0x0123_4567);
        assert_eq!(join_u128(&words), value);
    }

    #[test]
    fn test_u16_pack_unpack()
    {
        assert_eq!(pack_u16(0x037f, 0x3800), 0x3800_037f);
        assert_eq!(unpack_u16(0x3800_037f), (0x037f, 0x3800));
    }
}
