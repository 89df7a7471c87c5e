//! AArch32 call encodings, ARM and Thumb state.

use super::{halfword, word, CallClassifier};

/// Call classifier for AArch32
///
/// Recognises both instruction sets, since a stack may mix ARM and Thumb
/// callers:
///
/// - ARM: `BL imm`, `BLX imm`, `BLX Rm` (4 bytes)
/// - Thumb-2: `BL imm`, `BLX imm` (4 bytes)
/// - Thumb: `BLX Rm` (2 bytes)
///
/// 4-byte encodings are tried first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmCallClassifier;

impl CallClassifier for ArmCallClassifier
{
    fn call_length(&self, bytes: &[u8]) -> Option<usize>
    {
        if let Some(insn) = word(bytes, 0) {
            if is_arm_call(insn) {
                return Some(4);
            }
        }

        let first = halfword(bytes, 0)?;
        if let Some(second) = halfword(bytes, 2) {
            if is_thumb2_call(first, second) {
                return Some(4);
            }
        }

        // BLX Rm: 0100 0111 1 Rm 000
        (first & 0xff87 == 0x4780).then_some(2)
    }
}

fn is_arm_call(insn: u32) -> bool
{
    let cond = insn >> 28;
    if cond == 0xf {
        // BLX imm: 1111 101H imm24
        return insn & 0xfe00_0000 == 0xfa00_0000;
    }
    // BL imm: cond 1011 imm24
    let bl = insn & 0x0f00_0000 == 0x0b00_0000;
    // BLX Rm: cond 0001 0010 1111 1111 1111 0011 Rm
    let blx_reg = insn & 0x0fff_fff0 == 0x012f_ff30;
    bl || blx_reg
}

fn is_thumb2_call(first: u16, second: u16) -> bool
{
    // 11110 S imm10, then 11J1J imm11 (BL) or 11J0J imm10H 0 (BLX)
    first & 0xf800 == 0xf000 && (second & 0xd000 == 0xd000 || second & 0xd001 == 0xc000)
}
