//! # Error Types
//!
//! Errors surfaced by the register model and the session glue.
//!
//! The stack unwinder itself never returns these: memory that cannot be read
//! simply does not yield a frame. They exist for API misuse (writing to a
//! register that holds no data, filling a register file with another
//! architecture's context) and for the collaborators the core consumes.

use thiserror::Error;

use crate::types::{Address, Architecture, ThreadId};

/// Main error type for stackscope operations
#[derive(Error, Debug)]
pub enum CoreError
{
    /// The name matches no alias of the active register table.
    #[error("Unknown register: {0}")]
    UnknownRegister(String),

    /// The register exists but its sub-block holds no captured state.
    #[error("Register {0} is not available: its register block has not been filled")]
    RegisterUnavailable(String),

    /// A raw context of one architecture was applied to a register file of another.
    #[error("Architecture mismatch: register file is {expected}, context is {found}")]
    ArchitectureMismatch
    {
        /// Architecture of the register file
        expected: Architecture,
        /// Architecture of the raw context
        found: Architecture,
    },

    /// The architecture name is not one of the supported targets.
    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// Memory at the given address could not be read.
    #[error("Failed to read {len} bytes at {address}")]
    MemoryReadFailed
    {
        /// First address of the attempted read
        address: Address,
        /// Number of bytes requested
        len: usize,
    },

    /// Fewer bytes than requested were available. Partial reads are failures.
    #[error("Short read at {address}: requested {requested} bytes, got {actual}")]
    ShortRead
    {
        /// First address of the attempted read
        address: Address,
        /// Number of bytes requested
        requested: usize,
        /// Number of bytes actually available
        actual: usize,
    },

    /// Memory at the given address could not be written.
    #[error("Failed to write {len} bytes at {address}")]
    MemoryWriteFailed
    {
        /// First address of the attempted write
        address: Address,
        /// Number of bytes to write
        len: usize,
    },

    /// A memory region could not be mapped into a snapshot.
    #[error("Invalid memory region: {0}")]
    InvalidRegion(String),

    /// No process is attached or it has no current thread.
    #[error("No current thread to inspect")]
    NoThread,

    /// Capturing register state from a thread failed.
    #[error("Failed to capture state of thread {thread}: {details}")]
    StateCaptureFailed
    {
        /// Thread whose state could not be read
        thread: ThreadId,
        /// Additional error details
        details: String,
    },

    /// The memory region view could not be refreshed.
    #[error("Failed to refresh memory regions: {0}")]
    RegionRefreshFailed(String),

    /// The call classifier could not be constructed.
    #[error("Call classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// I/O error from a collaborator (e.g. reading `/proc/<pid>/mem`)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, CoreError>`
///
/// ```rust
/// use stackscope_core::error::CoreResult;
/// fn foo() -> CoreResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type CoreResult<T> = std::result::Result<T, CoreError>;
