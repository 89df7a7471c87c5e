//! # Memory
//!
//! The memory and region view the unwinder scans.
//!
//! Two capabilities are consumed from the surrounding debug session:
//! reading bytes ([`MemoryAccess`]) and resolving the region an address
//! belongs to ([`RegionLookup`]). Both are synchronous and may fail for any
//! single address without affecting the next.
//!
//! [`MemorySnapshot`] implements both over captured bytes, for offline
//! analysis of a saved stack and for tests.

use tracing::trace;

use crate::error::{CoreError, CoreResult};
use crate::types::{Address, MemoryRegion, MemoryRegionId};

/// Read access to the traced process's memory
pub trait MemoryAccess
{
    /// Read exactly `len` bytes starting at `address`.
    ///
    /// ## Errors
    ///
    /// [`CoreError::MemoryReadFailed`] if the memory is not readable, and
    /// [`CoreError::ShortRead`] if fewer than `len` bytes are available.
    /// A partial read is never returned as success.
    fn read_bytes(&self, address: Address, len: usize) -> CoreResult<Vec<u8>>;

    /// Read a little-endian pointer-sized word of `width` bytes (1 to 8).
    ///
    /// ## Errors
    ///
    /// As for [`read_bytes`](Self::read_bytes); a width outside `1..=8`
    /// reports [`CoreError::MemoryReadFailed`].
    fn read_pointer(&self, address: Address, width: u8) -> CoreResult<u64>
    {
        let len = usize::from(width);
        if !(1..=8).contains(&len) {
            return Err(CoreError::MemoryReadFailed { address, len });
        }

        let bytes = self.read_bytes(address, len)?;
        if bytes.len() < len {
            return Err(CoreError::ShortRead {
                address,
                requested: len,
                actual: bytes.len(),
            });
        }
        let mut word = [0u8; 8];
        word[..len].copy_from_slice(&bytes[..len]);
        Ok(u64::from_le_bytes(word))
    }
}

/// Resolution of addresses to the memory regions containing them
///
/// The view must be refreshed by the caller before an unwind starts; it is
/// treated as fixed for the duration of the scan.
pub trait RegionLookup
{
    /// The region containing `address`, if any.
    fn find_region(&self, address: Address) -> Option<MemoryRegion>;
}

impl<T: MemoryAccess + ?Sized> MemoryAccess for &T
{
    fn read_bytes(&self, address: Address, len: usize) -> CoreResult<Vec<u8>>
    {
        (**self).read_bytes(address, len)
    }
}

impl<T: RegionLookup + ?Sized> RegionLookup for &T
{
    fn find_region(&self, address: Address) -> Option<MemoryRegion>
    {
        (**self).find_region(address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MappedRegion
{
    region: MemoryRegion,
    data: Vec<u8>,
}

/// In-memory process image made of captured regions
///
/// Regions are added with [`map`](Self::map) and hold their bytes directly.
/// Ranges can be marked unreadable with [`protect`](Self::protect), which
/// makes any read overlapping them fail while leaving the region map intact,
/// the way a guard page or a racing `munmap` behaves in a live process.
///
/// ```rust
/// use stackscope_core::memory::{MemoryAccess, MemorySnapshot, RegionLookup};
/// use stackscope_core::types::Address;
///
/// let mut memory = MemorySnapshot::new();
/// let stack = memory.map(Address::from(0x7000), vec![0; 0x100], "rw-", Some("[stack]")).unwrap();
/// memory.write_pointer(Address::from(0x7010), 0xdead_beef, 8).unwrap();
///
/// assert_eq!(memory.read_pointer(Address::from(0x7010), 8).unwrap(), 0xdead_beef);
/// assert_eq!(memory.find_region(Address::from(0x70ff)).map(|r| r.id), Some(stack));
/// assert!(memory.read_bytes(Address::from(0x70f8), 16).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySnapshot
{
    regions: Vec<MappedRegion>,
    protected: Vec<(Address, Address)>,
}

impl MemorySnapshot
{
    /// Create an empty snapshot.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Map `data` at `start` as a new region and return its id.
    ///
    /// ## Errors
    ///
    /// [`CoreError::InvalidRegion`] if the region is empty, wraps around the
    /// address space, or overlaps a region already mapped.
    pub fn map(
        &mut self,
        start: Address,
        data: Vec<u8>,
        permissions: &str,
        name: Option<&str>,
    ) -> CoreResult<MemoryRegionId>
    {
        if data.is_empty() {
            return Err(CoreError::InvalidRegion(format!("empty region at {start}")));
        }
        let end = start
            .checked_add(data.len() as u64)
            .ok_or_else(|| CoreError::InvalidRegion(format!("region at {start} wraps the address space")))?;

        if let Some(existing) = self
            .regions
            .iter()
            .find(|mapped| mapped.region.start < end && start < mapped.region.end)
        {
            return Err(CoreError::InvalidRegion(format!(
                "{start}..{end} overlaps {}..{}",
                existing.region.start, existing.region.end
            )));
        }

        let id = MemoryRegionId(self.regions.len());
        let region = MemoryRegion::new(id, start, end, permissions.to_string(), name.map(str::to_string));
        self.regions.push(MappedRegion { region, data });
        Ok(id)
    }

    /// Make every read overlapping `[address, address + len)` fail.
    pub fn protect(&mut self, address: Address, len: u64)
    {
        let end = address.checked_add(len).unwrap_or(Address::new(u64::MAX));
        self.protected.push((address, end));
    }

    /// Overwrite bytes inside a mapped region.
    ///
    /// Protection does not apply to writes.
    ///
    /// ## Errors
    ///
    /// [`CoreError::MemoryWriteFailed`] if the span is not inside one region.
    pub fn write(&mut self, address: Address, bytes: &[u8]) -> CoreResult<()>
    {
        let failed = || CoreError::MemoryWriteFailed {
            address,
            len: bytes.len(),
        };

        let mapped = self
            .regions
            .iter_mut()
            .find(|mapped| mapped.region.contains_range(address, bytes.len() as u64))
            .ok_or_else(failed)?;
        let offset = usize::try_from(address - mapped.region.start).map_err(|_| failed())?;
        mapped.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Write `value` as a little-endian word of `width` bytes.
    ///
    /// ## Errors
    ///
    /// [`CoreError::MemoryWriteFailed`] if the span is not inside one region
    /// or `width` is outside `1..=8`.
    pub fn write_pointer(&mut self, address: Address, value: u64, width: u8) -> CoreResult<()>
    {
        let len = usize::from(width);
        if !(1..=8).contains(&len) {
            return Err(CoreError::MemoryWriteFailed { address, len });
        }
        self.write(address, &value.to_le_bytes()[..len])
    }

    /// Every mapped region, in mapping order.
    pub fn regions(&self) -> impl Iterator<Item = &MemoryRegion>
    {
        self.regions.iter().map(|mapped| &mapped.region)
    }

    fn is_protected(&self, start: Address, end: Address) -> bool
    {
        self.protected
            .iter()
            .any(|&(lo, hi)| lo < end && start < hi)
    }
}

impl MemoryAccess for MemorySnapshot
{
    fn read_bytes(&self, address: Address, len: usize) -> CoreResult<Vec<u8>>
    {
        let failed = CoreError::MemoryReadFailed { address, len };

        let Some(mapped) = self.regions.iter().find(|mapped| mapped.region.contains(address)) else {
            trace!(%address, len, "read outside any mapped region");
            return Err(failed);
        };

        let offset = usize::try_from(address - mapped.region.start).map_err(|_| failed)?;
        let available = mapped.data.len() - offset;
        if available < len {
            return Err(CoreError::ShortRead {
                address,
                requested: len,
                actual: available,
            });
        }

        let end = address + len as u64;
        if self.is_protected(address, end) {
            trace!(%address, len, "read overlaps a protected range");
            return Err(CoreError::MemoryReadFailed { address, len });
        }

        Ok(mapped.data[offset..offset + len].to_vec())
    }
}

impl RegionLookup for MemorySnapshot
{
    fn find_region(&self, address: Address) -> Option<MemoryRegion>
    {
        self.regions
            .iter()
            .find(|mapped| mapped.region.contains(address))
            .map(|mapped| mapped.region.clone())
    }
}
