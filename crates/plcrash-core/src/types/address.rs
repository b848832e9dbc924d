//! Memory address type.

use std::fmt;

/// Strongly typed memory address
///
/// This wrapper around `u64` keeps program counters, image base addresses and
/// fault addresses apart from sizes, counts and register values.
///
/// Addresses in a crash record come straight from the decoder and are not
/// validated; arithmetic on them is checked or saturating so a malformed
/// record can never cause a panic while rendering.
///
/// ## Example
///
/// ```rust
/// use plcrash_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// assert_eq!(addr.saturating_add(0x100).value(), 0x1100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// This is equivalent to `Address::from(value)` but can be used in const contexts.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Distance from `base` up to this address, or `None` if `base` lies above it
    ///
    /// ## Example
    ///
    /// ```rust
    /// use plcrash_core::types::Address;
    ///
    /// let pc = Address::from(0x1010);
    /// assert_eq!(pc.offset_from(Address::from(0x1000)), Some(0x10));
    /// assert_eq!(pc.offset_from(Address::from(0x2000)), None);
    /// ```
    pub fn offset_from(self, base: Address) -> Option<u64>
    {
        self.0.checked_sub(base.0)
    }

    /// Add an offset to this address, saturating at the maximum value
    ///
    /// ## Example
    ///
    /// ```rust
    /// use plcrash_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.saturating_add(u64::MAX), Address::new(u64::MAX));
    /// ```
    pub fn saturating_add(self, offset: u64) -> Self
    {
        Address(self.0.saturating_add(offset))
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
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
