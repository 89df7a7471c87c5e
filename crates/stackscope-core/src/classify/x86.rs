//! x86 and x86-64 call encodings.
//!
//! Recognised forms, each optionally preceded by legacy prefixes (and a REX
//! prefix in 64-bit mode):
//!
//! | Opcode | Form | Length |
//! |---|---|---|
//! | `E8 cd` | `call rel32` (`rel16` with `66` in 32-bit mode) | 5 (3) |
//! | `FF /2` | `call r/m` | 2 + SIB + displacement |
//! | `FF /3` | `call far m16:32` (memory operand only) | 2 + SIB + displacement |
//! | `9A cp` | `call ptr16:32` (32-bit mode only) | 7 (5 with `66`) |

use super::CallClassifier;

/// Legacy prefixes accepted before the opcode; more than this cannot fit a
/// call within the longest window the unwinder scans.
const MAX_PREFIXES: usize = 4;

/// Decoding mode of an x86 classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X86Mode
{
    /// 32-bit protected mode (IA-32)
    Protected32,
    /// 64-bit long mode (x86-64)
    Long64,
}

/// Call classifier for IA-32 and x86-64
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X86CallClassifier
{
    mode: X86Mode,
}

impl X86CallClassifier
{
    /// Create a classifier decoding in `mode`.
    pub const fn new(mode: X86Mode) -> Self
    {
        Self { mode }
    }

    /// Decoding mode of this classifier.
    pub const fn mode(&self) -> X86Mode
    {
        self.mode
    }
}

impl CallClassifier for X86CallClassifier
{
    fn call_length(&self, bytes: &[u8]) -> Option<usize>
    {
        let long = self.mode == X86Mode::Long64;
        let mut operand16 = false;
        let mut address16 = false;
        let mut pos = 0;

        while let Some(&byte) = bytes.get(pos) {
            match byte {
                0x66 => operand16 = true,
                0x67 => address16 = !long,
                // segment overrides, and F2/F3 (BND / CET notrack forms)
                0x26 | 0x2e | 0x36 | 0x3e | 0x64 | 0x65 | 0xf2 | 0xf3 => {}
                _ => break,
            }
            pos += 1;
            if pos > MAX_PREFIXES {
                return None;
            }
        }

        if long && bytes.get(pos).is_some_and(|&byte| byte & 0xf0 == 0x40) {
            pos += 1;
        }

        let opcode = *bytes.get(pos)?;
        pos += 1;

        let length = match opcode {
            0xe8 if operand16 && !long => pos + 2,
            0xe8 => pos + 4,
            0x9a if long => return None,
            0x9a if operand16 => pos + 4,
            0x9a => pos + 6,
            0xff => {
                let modrm = *bytes.get(pos)?;
                let reg = (modrm >> 3) & 7;
                let indirect = modrm >> 6 != 3;
                match reg {
                    2 => {}
                    3 if indirect => {}
                    _ => return None,
                }
                pos + 1 + operand_length(modrm, bytes.get(pos + 1).copied(), address16)?
            }
            _ => return None,
        };

        (length <= bytes.len()).then_some(length)
    }
}

/// Bytes following a ModRM byte: SIB and displacement.
fn operand_length(modrm: u8, sib: Option<u8>, address16: bool) -> Option<usize>
{
    let mode = modrm >> 6;
    let rm = modrm & 7;

    if address16 {
        return Some(match (mode, rm) {
            (3, _) => 0,
            (0, 6) => 2,
            (0, _) => 0,
            (1, _) => 1,
            _ => 2,
        });
    }

    if mode == 3 {
        return Some(0);
    }

    let mut length = 0;
    let mut sib_disp32 = false;
    if rm == 4 {
        let sib = sib?;
        length += 1;
        sib_disp32 = mode == 0 && sib & 7 == 5;
    }

    length += match mode {
        0 if rm == 5 || sib_disp32 => 4,
        0 => 0,
        1 => 1,
        _ => 4,
    };
    Some(length)
}

#[cfg(test)]
mod tests
{
    use super::*;

    const X64: X86CallClassifier = X86CallClassifier::new(X86Mode::Long64);
    const X32: X86CallClassifier = X86CallClassifier::new(X86Mode::Protected32);

    #[test]
    fn test_direct_calls()
    {
        assert_eq!(X64.call_length(&[0xe8, 0, 0, 0, 0]), Some(5));
        assert_eq!(X32.call_length(&[0x66, 0xe8, 0, 0]), Some(4));
        assert_eq!(X64.call_length(&[0xe8, 0, 0]), None);
    }

    #[test]
    fn test_indirect_calls()
    {
        assert_eq!(X64.call_length(&[0xff, 0xd0]), Some(2)); // call rax
        assert_eq!(X64.call_length(&[0x41, 0xff, 0xd3]), Some(3)); // call r11
        assert_eq!(X64.call_length(&[0xff, 0x55, 0x08]), Some(3)); // call [rbp+8]
        assert_eq!(X64.call_length(&[0xff, 0x54, 0x24, 0x08]), Some(4)); // call [rsp+8]
        assert_eq!(X64.call_length(&[0xff, 0x15, 1, 2, 3, 4]), Some(6)); // call [rip+disp32]
        assert_eq!(X64.call_length(&[0xff, 0x14, 0x25, 1, 2, 3, 4]), Some(7)); // call [disp32]
        assert_eq!(X64.call_length(&[0xff, 0x94, 0x24, 1, 2, 3, 4]), Some(7)); // call [rsp+disp32]
    }

    #[test]
    fn test_far_calls()
    {
        assert_eq!(X32.call_length(&[0x9a, 1, 2, 3, 4, 5, 6]), Some(7));
        assert_eq!(X64.call_length(&[0x9a, 1, 2, 3, 4, 5, 6]), None);
        assert_eq!(X64.call_length(&[0xff, 0x18]), Some(2)); // call far [rax]
        assert_eq!(X64.call_length(&[0xff, 0xd8]), None); // /3 needs memory
    }

    #[test]
    fn test_sixteen_bit_addressing()
    {
        assert_eq!(X32.call_length(&[0x67, 0xff, 0x16, 1, 2]), Some(5)); // call [disp16]
        assert_eq!(X32.call_length(&[0x67, 0xff, 0x57, 4]), Some(4)); // call [bx+4]
    }

    #[test]
    fn test_rex_is_not_a_prefix_in_32_bit_mode()
    {
        // 0x41 is `inc ecx` on IA-32
        assert_eq!(X32.call_length(&[0x41, 0xff, 0xd3]), None);
    }

    #[test]
    fn test_non_calls()
    {
        assert_eq!(X64.call_length(&[]), None);
        assert_eq!(X64.call_length(&[0xc3]), None);
        assert_eq!(X64.call_length(&[0xff, 0xe0]), None); // jmp rax
        assert_eq!(X64.call_length(&[0x66, 0x66, 0x66, 0x66, 0x66, 0xe8, 0, 0, 0, 0]), None);
    }
}
