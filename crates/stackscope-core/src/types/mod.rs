//! # Types
//!
//! Plain value types shared by the register model and the unwinder.

pub mod address;
pub mod process;

pub use address::Address;
pub use process::{Architecture, MemoryRegion, MemoryRegionId, ThreadId};
