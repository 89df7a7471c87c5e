//! # stackscope-core
//!
//! Debuggee state model and heuristic call-stack reconstruction.
//!
//! This crate provides:
//! - An architecture-independent register file with legacy name aliases
//!   (x86, x86-64, ARM, AArch64)
//! - `#[repr(C)]` mirrors of the Linux raw register contexts
//! - Call instruction classifiers for each supported instruction set
//! - A stack unwinder that recovers return addresses without debug info
//!
//! ## Architecture as data
//!
//! Nothing in the register file or the unwinder is written per CPU. Each
//! [`Architecture`] selects a static
//! [`RegisterAliasTable`](registers::RegisterAliasTable), a raw context
//! layout, a pointer width and a call length range; the code is written
//! once against those.
//!
//! ## Example
//!
//! ```rust
//! use stackscope_core::prelude::*;
//!
//! let mut raw = UserRegsX86_64::default();
//! raw.rsp = 0x7ffe_0000;
//! raw.rbp = 0x7ffe_0010;
//!
//! let mut regs = RegisterFile::new(Architecture::X86_64);
//! regs.fill(&raw).unwrap();
//!
//! let memory = MemorySnapshot::new();
//! let classifier = classify::for_architecture(Architecture::X86_64);
//! let config = UnwindConfig::for_architecture(Architecture::X86_64);
//!
//! // no stack memory was captured, so the heuristic does not apply
//! let stack = StackUnwinder::new(config, &memory, &classifier).unwind(&regs);
//! assert!(stack.is_empty());
//! ```

pub mod classify;
pub mod error;
pub mod memory;
pub mod prelude;
pub mod raw;
pub mod registers;
pub mod session;
pub mod types;
pub mod unwind;

pub use error::{CoreError, CoreResult};
pub use registers::RegisterFile;
pub use types::{Address, Architecture};
pub use unwind::{CallStack, StackFrame};
