//! Process-level types: threads, memory regions, and target architecture.

use std::fmt;
use std::str::FromStr;

use super::Address;
use crate::error::CoreError;
use crate::registers::{tables, RegisterAliasTable};

/// Thread identifier in the traced process
///
/// The value is whatever the surrounding session uses to name a thread
/// (a Linux TID, a Mach thread port, a Windows thread id). The core never
/// interprets it; it only hands it back to [`DebugTarget::capture_state`].
///
/// [`DebugTarget::capture_state`]: crate::session::DebugTarget::capture_state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(pub u64);

impl ThreadId
{
    /// Get the raw `u64` value of this thread identifier
    pub fn raw(self) -> u64
    {
        self.0
    }
}

impl From<u64> for ThreadId
{
    fn from(value: u64) -> Self
    {
        ThreadId(value)
    }
}

impl fmt::Display for ThreadId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a memory region
///
/// Two lookups that resolve to the same mapping return the same id; the
/// unwinder relies on this to decide whether the stack and frame pointers
/// live in the same region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRegionId(pub usize);

impl MemoryRegionId
{
    /// Get the raw `usize` value of this memory region identifier
    pub fn value(self) -> usize
    {
        self.0
    }
}

/// Memory region in a process
///
/// A contiguous, bounded span of the traced process's address space, such as
/// a thread stack, the heap, or a mapped image.
///
/// ## Example
///
/// ```
/// use stackscope_core::types::{Address, MemoryRegion, MemoryRegionId};
///
/// let stack = MemoryRegion::new(
///     MemoryRegionId(3),
///     Address::from(0x7ff0_0000),
///     Address::from(0x7ff2_0000),
///     "rw-".to_string(),
///     Some("[stack]".to_string()),
/// );
/// assert!(stack.contains(Address::from(0x7ff1_fff8)));
/// assert!(!stack.contains(Address::from(0x7ff2_0000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion
{
    /// Stable identifier for the region.
    pub id: MemoryRegionId,
    /// Start address of the memory region (inclusive)
    pub start: Address,
    /// End address of the memory region (exclusive)
    pub end: Address,
    /// Memory permissions as a string, e.g. `"rw-"` or `"r-x"`.
    pub permissions: String,
    /// Optional name of the region (`"[stack]"`, a file path, ...).
    pub name: Option<String>,
}

impl MemoryRegion
{
    /// Create a new memory region
    ///
    /// `end <= start` is accepted and describes an empty region.
    pub fn new(id: MemoryRegionId, start: Address, end: Address, permissions: String, name: Option<String>) -> Self
    {
        Self {
            id,
            start,
            end,
            permissions,
            name,
        }
    }

    /// Size of the memory region in bytes (0 for an inverted range)
    pub fn size(&self) -> u64
    {
        self.end.value().saturating_sub(self.start.value())
    }

    /// Check if the region is readable
    pub fn is_readable(&self) -> bool
    {
        self.permissions.contains('r')
    }

    /// Check if the region is writable
    pub fn is_writable(&self) -> bool
    {
        self.permissions.contains('w')
    }

    /// Check if the region is executable
    pub fn is_executable(&self) -> bool
    {
        self.permissions.contains('x')
    }

    /// Check if an address lies within `[start, end)`
    pub fn contains(&self, address: Address) -> bool
    {
        address >= self.start && address < self.end
    }

    /// Check if the whole span `[address, address + len)` lies within the region.
    pub fn contains_range(&self, address: Address, len: u64) -> bool
    {
        match address.checked_add(len) {
            Some(end) => address >= self.start && end <= self.end,
            None => false,
        }
    }
}

/// CPU architecture of the debug target
///
/// Selected once per debugging session. Everything that differs between
/// CPUs hangs off this value as data: the register alias table, the pointer
/// width, and the length range of call instructions.
///
/// ```rust
/// use stackscope_core::types::Architecture;
///
/// let arch: Architecture = "amd64".parse().unwrap();
/// assert_eq!(arch, Architecture::X86_64);
/// assert_eq!(arch.pointer_size_bytes(), 8);
/// assert_eq!(arch.call_length_bounds(), (2, 7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture
{
    /// 32-bit x86 (IA-32)
    X86,
    /// 64-bit x86 (Intel/AMD)
    X86_64,
    /// 32-bit ARM (AArch32, ARM and Thumb states)
    Arm,
    /// 64-bit ARM (AArch64)
    Arm64,
}

impl Architecture
{
    /// Every supported architecture, in declaration order.
    pub const ALL: [Architecture; 4] = [
        Architecture::X86,
        Architecture::X86_64,
        Architecture::Arm,
        Architecture::Arm64,
    ];

    /// Architecture of the running debugger binary, if it is supported.
    pub const fn current() -> Option<Self>
    {
        #[cfg(target_arch = "x86")]
        {
            Some(Architecture::X86)
        }

        #[cfg(target_arch = "x86_64")]
        {
            Some(Architecture::X86_64)
        }

        #[cfg(target_arch = "arm")]
        {
            Some(Architecture::Arm)
        }

        #[cfg(target_arch = "aarch64")]
        {
            Some(Architecture::Arm64)
        }

        #[cfg(not(any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "arm",
            target_arch = "aarch64"
        )))]
        {
            None
        }
    }

    /// Size of a pointer in bytes for this architecture.
    #[must_use]
    pub const fn pointer_size_bytes(self) -> u8
    {
        match self {
            Architecture::X86 | Architecture::Arm => 4,
            Architecture::X86_64 | Architecture::Arm64 => 8,
        }
    }

    /// Minimum and maximum encoded length of a call instruction, in bytes.
    ///
    /// - x86 / x86-64: 2 (`call reg`) through 7 (`call [disp32 + base]` with prefix)
    /// - ARM: 2 (Thumb `blx reg`) through 4 (`bl`, `blx`)
    /// - AArch64: always 4 (`bl`, `blr`)
    #[must_use]
    pub const fn call_length_bounds(self) -> (usize, usize)
    {
        match self {
            Architecture::X86 | Architecture::X86_64 => (2, 7),
            Architecture::Arm => (2, 4),
            Architecture::Arm64 => (4, 4),
        }
    }

    /// The register alias table for this architecture.
    #[must_use]
    pub fn register_table(self) -> &'static RegisterAliasTable
    {
        match self {
            Architecture::X86 => &tables::X86,
            Architecture::X86_64 => &tables::X86_64,
            Architecture::Arm => &tables::ARM,
            Architecture::Arm64 => &tables::ARM64,
        }
    }

    /// Short lowercase name (`"x86"`, `"x86_64"`, `"arm"`, `"arm64"`).
    #[must_use]
    pub const fn name(self) -> &'static str
    {
        match self {
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Architecture
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture
{
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" | "ia32" => Ok(Architecture::X86),
            "x86_64" | "x86-64" | "amd64" | "x64" => Ok(Architecture::X86_64),
            "arm" | "arm32" | "armv7" | "aarch32" => Ok(Architecture::Arm),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            _ => Err(CoreError::UnsupportedArchitecture(s.to_string())),
        }
    }
}
