//! The one alignment primitive shared by the writer and the reader

/// Round `offset` up to the next multiple of `alignment`
///
/// `alignment` must be a power of two. Offsets are measured from the start of
/// the encoded document.
#[inline]
pub const fn align(offset: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (offset + alignment - 1) & !(alignment - 1)
}
