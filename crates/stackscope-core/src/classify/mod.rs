//! # Call Classifiers
//!
//! Recognition of procedure-call instructions.
//!
//! The unwinder does not need a disassembler. It needs one answer: "do
//! these bytes start with a call instruction, and how long is it?". A
//! [`CallClassifier`] gives that answer for one instruction set. The
//! built-in classifiers decode the handful of call encodings each ISA has
//! directly from the opcode bits; with the `capstone` feature a
//! Capstone-backed classifier is available as well.
//!
//! ```rust
//! use stackscope_core::classify::{self, CallClassifier};
//! use stackscope_core::types::Architecture;
//!
//! let classifier = classify::for_architecture(Architecture::X86_64);
//! assert_eq!(classifier.call_length(&[0xe8, 0x10, 0x00, 0x00, 0x00]), Some(5)); // call rel32
//! assert_eq!(classifier.call_length(&[0xff, 0xd0]), Some(2)); // call rax
//! assert_eq!(classifier.call_length(&[0xc3]), None); // ret
//! ```

mod arm;
mod arm64;
#[cfg(feature = "capstone")]
mod capstone;
mod x86;

pub use arm::ArmCallClassifier;
pub use arm64::Arm64CallClassifier;
#[cfg(feature = "capstone")]
pub use self::capstone::CapstoneCallClassifier;
pub use x86::{X86CallClassifier, X86Mode};

use crate::types::Architecture;

/// Decides whether a byte buffer starts with a call instruction
pub trait CallClassifier
{
    /// Encoded length of the call instruction at the start of `bytes`.
    ///
    /// Returns `None` when the bytes do not decode to a call, or when the
    /// call encoding would extend past the end of `bytes`. Bytes following
    /// the instruction are ignored.
    fn call_length(&self, bytes: &[u8]) -> Option<usize>;
}

impl<T: CallClassifier + ?Sized> CallClassifier for Box<T>
{
    fn call_length(&self, bytes: &[u8]) -> Option<usize>
    {
        (**self).call_length(bytes)
    }
}

/// The built-in classifier for `architecture`.
pub fn for_architecture(architecture: Architecture) -> Box<dyn CallClassifier + Send + Sync>
{
    match architecture {
        Architecture::X86 => Box::new(X86CallClassifier::new(X86Mode::Protected32)),
        Architecture::X86_64 => Box::new(X86CallClassifier::new(X86Mode::Long64)),
        Architecture::Arm => Box::new(ArmCallClassifier),
        Architecture::Arm64 => Box::new(Arm64CallClassifier),
    }
}

/// Read a little-endian `u16` at `offset`.
fn halfword(bytes: &[u8], offset: usize) -> Option<u16>
{
    let pair = bytes.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([pair[0], pair[1]]))
}

/// Read a little-endian `u32` at `offset`.
fn word(bytes: &[u8], offset: usize) -> Option<u32>
{
    let quad = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
}
