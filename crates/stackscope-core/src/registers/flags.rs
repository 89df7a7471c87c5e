//! Decoding of flags / status registers for display.

use crate::types::Architecture;

const X86_FLAGS: [(u32, &str); 9] = [
    (0, "CF"),
    (2, "PF"),
    (4, "AF"),
    (6, "ZF"),
    (7, "SF"),
    (8, "TF"),
    (9, "IF"),
    (10, "DF"),
    (11, "OF"),
];

const ARM_CONDITION_FLAGS: [(u32, &str); 5] = [(31, "N"), (30, "Z"), (29, "C"), (28, "V"), (27, "Q")];

const ARM64_CONDITION_FLAGS: [(u32, &str); 4] = [(31, "N"), (30, "Z"), (29, "C"), (28, "V")];

/// Names of the condition flags set in `value`, in bit order for x86 and
/// `NZCV` order for ARM.
///
/// ```rust
/// use stackscope_core::registers::flags::condition_flags;
/// use stackscope_core::types::Architecture;
///
/// assert_eq!(condition_flags(Architecture::X86_64, 0x246), ["PF", "ZF", "IF"]);
/// assert_eq!(condition_flags(Architecture::Arm, 0x6000_0010), ["Z", "C"]);
/// ```
pub fn condition_flags(architecture: Architecture, value: u64) -> Vec<&'static str>
{
    let table: &[(u32, &str)] = match architecture {
        Architecture::X86 | Architecture::X86_64 => &X86_FLAGS,
        Architecture::Arm => &ARM_CONDITION_FLAGS,
        Architecture::Arm64 => &ARM64_CONDITION_FLAGS,
    };
    table
        .iter()
        .filter(|(bit, _)| value & (1u64 << bit) != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// One-line description of a flags register value.
///
/// x86 lists the set flags; ARM adds the Thumb state and processor mode;
/// AArch64 adds the exception level and stack pointer selection.
pub fn describe(architecture: Architecture, value: u64) -> String
{
    let mut parts: Vec<String> = condition_flags(architecture, value)
        .into_iter()
        .map(str::to_string)
        .collect();

    match architecture {
        Architecture::X86 | Architecture::X86_64 => {}
        Architecture::Arm => {
            if value & (1 << 5) != 0 {
                parts.push("T".to_string());
            }
            parts.push(format!("({})", arm_mode_name(value & 0x1f)));
        }
        Architecture::Arm64 => {
            parts.push(format!("({})", arm64_mode_name(value & 0x1f)));
        }
    }

    parts.join(" ")
}

fn arm_mode_name(mode: u64) -> &'static str
{
    match mode {
        0x10 => "usr",
        0x11 => "fiq",
        0x12 => "irq",
        0x13 => "svc",
        0x16 => "mon",
        0x17 => "abt",
        0x1a => "hyp",
        0x1b => "und",
        0x1f => "sys",
        _ => "invalid mode",
    }
}

fn arm64_mode_name(mode: u64) -> &'static str
{
    // M[4] set: the thread runs in AArch32 state.
    if mode & 0x10 != 0 {
        return arm_mode_name(mode);
    }
    match mode {
        0b0000 => "EL0t",
        0b0100 => "EL1t",
        0b0101 => "EL1h",
        0b1000 => "EL2t",
        0b1001 => "EL2h",
        0b1100 => "EL3t",
        0b1101 => "EL3h",
        _ => "invalid mode",
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_x86_describe_lists_flags_in_bit_order()
    {
        assert_eq!(describe(Architecture::X86, 0x0000_0ad5), "CF PF AF ZF SF IF OF");
        assert_eq!(describe(Architecture::X86_64, 0), "");
    }

    #[test]
    fn test_arm_describe_includes_thumb_and_mode()
    {
        assert_eq!(describe(Architecture::Arm, 0x8000_0030), "N T (usr)");
        assert_eq!(describe(Architecture::Arm, 0x0800_0013), "Q (svc)");
        assert_eq!(describe(Architecture::Arm, 0x0000_0005), "(invalid mode)");
    }

    #[test]
    fn test_arm64_describe_includes_exception_level()
    {
        assert_eq!(describe(Architecture::Arm64, 0x6000_0000), "Z C (EL0t)");
        assert_eq!(describe(Architecture::Arm64, 0x0000_03c5), "(EL1h)");
        assert_eq!(describe(Architecture::Arm64, 0x0000_0010), "(usr)");
    }
}
