//! Memory address type.

use std::fmt;
use std::ops::{Add, Sub};

/// Strongly typed address in the traced process
///
/// A `u64` newtype so stack words, lengths and register values are never
/// mixed up with addresses by accident. 32-bit targets store their addresses
/// zero-extended.
///
/// ## Example
///
/// ```rust
/// use stackscope_core::types::Address;
///
/// let fp = Address::from(0x7ffd_1000);
/// assert!(fp.is_aligned(8));
/// assert_eq!((fp + 8).value(), 0x7ffd_1008);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value (usable in const contexts)
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Returns `true` if the address is a multiple of `alignment`.
    ///
    /// An alignment of zero is treated as "never aligned" so callers cannot
    /// divide by zero through a misconfigured pointer width.
    ///
    /// ```rust
    /// use stackscope_core::types::Address;
    ///
    /// assert!(Address::new(0x1000).is_aligned(8));
    /// assert!(!Address::new(0x1004).is_aligned(8));
    /// assert!(Address::new(0x1004).is_aligned(4));
    /// ```
    pub const fn is_aligned(self, alignment: u64) -> bool
    {
        alignment != 0 && self.0 % alignment == 0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ```rust
    /// use stackscope_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u64::MAX), None);
    /// ```
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Subtract an offset from this address, checking for underflow
    ///
    /// ```rust
    /// use stackscope_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_sub(0x100), Some(Address::from(0xf00)));
    /// assert_eq!(addr.checked_sub(0x1001), None);
    /// ```
    pub fn checked_sub(self, offset: u64) -> Option<Self>
    {
        self.0.checked_sub(offset).map(Address)
    }

    /// Apply a signed displacement, checking for overflow in either direction.
    pub fn checked_offset(self, delta: i64) -> Option<Self>
    {
        self.0.checked_add_signed(delta).map(Address)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Sub<u64> for Address
{
    type Output = Address;

    fn sub(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs))
    }
}

impl Sub<Address> for Address
{
    type Output = u64;

    /// Distance between two addresses (wrapping).
    fn sub(self, rhs: Address) -> Self::Output
    {
        self.0.wrapping_sub(rhs.0)
    }
}
