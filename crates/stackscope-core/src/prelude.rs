//! Common module for library exports

pub use crate::classify::{self, CallClassifier};
pub use crate::error::{CoreError, CoreResult};
pub use crate::memory::{MemoryAccess, MemorySnapshot, RegionLookup};
pub use crate::raw::arm::{UserRegsArm, UserVfpArm};
pub use crate::raw::arm64::{UserFpsimdArm64, UserPtRegsArm64};
pub use crate::raw::x86::{UserFxsrX86, UserRegsX86};
pub use crate::raw::x86_64::{UserFpRegsX86_64, UserRegsX86_64};
pub use crate::raw::RawContext;
pub use crate::registers::float::FloatClass;
pub use crate::registers::{RegisterBlock, RegisterFile, RegisterRole, RegisterValue};
pub use crate::session::{backtrace, CapturedThread, DebugTarget};
pub use crate::types::{Address, Architecture, MemoryRegion, MemoryRegionId, ThreadId};
pub use crate::unwind::{CallStack, StackFrame, StackUnwinder, UnwindConfig};
