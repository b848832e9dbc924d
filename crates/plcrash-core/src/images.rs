//! Address-to-image attribution.
//!
//! Given the list of binary images loaded in the crashed process, find the
//! image that owns an address. This is image attribution only; no symbols are
//! resolved.
//!
//! Images from malformed reports may overlap. Overlaps are resolved by list
//! order: the first image containing the address wins, regardless of which
//! range is smaller or which base is closer.

use crate::types::{Address, BinaryImage};

/// Find the first image in `images` whose range `[base, base + size)` contains `address`.
///
/// ```rust
/// use plcrash_core::images::lookup;
/// use plcrash_core::types::{Address, BinaryImage};
///
/// let images = [BinaryImage::new("/usr/lib/libSystem.B.dylib", 0, 10)];
/// assert!(lookup(&images, Address::from(9)).is_some());
/// assert!(lookup(&images, Address::from(10)).is_none());
/// ```
pub fn lookup(images: &[BinaryImage], address: Address) -> Option<&BinaryImage>
{
    images.iter().find(|image| image.contains(address))
}

/// Last path component of an image name, or the whole name if it has no `/`.
pub fn short_name(image: &BinaryImage) -> &str
{
    image.short_name()
}

/// Borrowed view over the images of one crash record
///
/// Lookups are a linear scan; rendering is bounded by images × frames.
#[derive(Debug, Clone, Copy)]
pub struct BinaryImageIndex<'a>
{
    images: &'a [BinaryImage],
}

impl<'a> BinaryImageIndex<'a>
{
    pub fn new(images: &'a [BinaryImage]) -> Self
    {
        Self { images }
    }

    /// See [`lookup`].
    pub fn lookup(&self, address: Address) -> Option<&'a BinaryImage>
    {
        lookup(self.images, address)
    }

    /// Images in the order the decoder produced them.
    pub fn images(&self) -> &'a [BinaryImage]
    {
        self.images
    }

    pub fn len(&self) -> usize
    {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.images.is_empty()
    }
}
