//! AArch64 call encodings.

use super::{word, CallClassifier};

/// Call classifier for AArch64
///
/// Every call is 4 bytes: `BL imm26`, `BLR Xn`, and the pointer
/// authentication forms `BLRAA`, `BLRAB`, `BLRAAZ`, `BLRABZ`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arm64CallClassifier;

impl CallClassifier for Arm64CallClassifier
{
    fn call_length(&self, bytes: &[u8]) -> Option<usize>
    {
        let insn = word(bytes, 0)?;
        let bl = insn & 0xfc00_0000 == 0x9400_0000;
        let blr = insn & 0xffff_fc1f == 0xd63f_0000;
        let blr_auth = insn & 0xfeff_f800 == 0xd63f_0800;
        (bl || blr || blr_auth).then_some(4)
    }
}
