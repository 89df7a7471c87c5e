//! Capstone-backed call classifier.

use capstone::arch::{self, BuildsCapstone};
use capstone::Capstone;

use super::CallClassifier;
use crate::error::{CoreError, CoreResult};
use crate::types::Architecture;

const CALL_MNEMONICS: &[&str] = &["call", "lcall", "bl", "blx", "blr", "blraa", "blraaz", "blrab", "blrabz"];

/// Call classifier that disassembles with Capstone
///
/// AArch32 uses two engines, ARM then Thumb, and accepts the first that
/// decodes a call.
pub struct CapstoneCallClassifier
{
    engines: Vec<Capstone>,
    architecture: Architecture,
}

impl CapstoneCallClassifier
{
    /// Create a classifier for `architecture`.
    ///
    /// ## Errors
    ///
    /// [`CoreError::ClassifierUnavailable`] if a Capstone engine cannot be built.
    pub fn new(architecture: Architecture) -> CoreResult<Self>
    {
        let unavailable = |e: capstone::Error| CoreError::ClassifierUnavailable(format!("{architecture}: {e}"));

        let engines = match architecture {
            Architecture::X86 => vec![Capstone::new()
                .x86()
                .mode(arch::x86::ArchMode::Mode32)
                .build()
                .map_err(unavailable)?],
            Architecture::X86_64 => vec![Capstone::new()
                .x86()
                .mode(arch::x86::ArchMode::Mode64)
                .build()
                .map_err(unavailable)?],
            Architecture::Arm => vec![
                Capstone::new()
                    .arm()
                    .mode(arch::arm::ArchMode::Arm)
                    .build()
                    .map_err(unavailable)?,
                Capstone::new()
                    .arm()
                    .mode(arch::arm::ArchMode::Thumb)
                    .build()
                    .map_err(unavailable)?,
            ],
            Architecture::Arm64 => vec![Capstone::new()
                .arm64()
                .mode(arch::arm64::ArchMode::Arm)
                .build()
                .map_err(unavailable)?],
        };

        Ok(Self { engines, architecture })
    }

    /// Architecture this classifier decodes.
    pub fn architecture(&self) -> Architecture
    {
        self.architecture
    }
}

impl CallClassifier for CapstoneCallClassifier
{
    fn call_length(&self, bytes: &[u8]) -> Option<usize>
    {
        self.engines.iter().find_map(|engine| {
            let instructions = engine.disasm_count(bytes, 0, 1).ok()?;
            let insn = instructions.iter().next()?;
            let mnemonic = insn.mnemonic()?.to_ascii_lowercase();
            let is_call = CALL_MNEMONICS.contains(&mnemonic.as_str()) || is_conditional_bl(&mnemonic);
            is_call.then(|| insn.bytes().len())
        })
    }
}

/// ARM conditional `bl` forms (`bleq`, `blne`, ...).
fn is_conditional_bl(mnemonic: &str) -> bool
{
    const CONDITIONS: &[&str] = &[
        "eq", "ne", "cs", "hs", "cc", "lo", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt", "le", "al",
    ];
    mnemonic
        .strip_prefix("bl")
        .is_some_and(|suffix| CONDITIONS.contains(&suffix))
}

impl std::fmt::Debug for CapstoneCallClassifier
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("CapstoneCallClassifier")
            .field("architecture", &self.architecture)
            .field("engines", &self.engines.len())
            .finish()
    }
}
