//! In-place byte order flips for fixed-width elements
//!
//! Numeric and boolean payloads are flipped element by element; character
//! payloads are never passed through here.

/// Reverse the bytes of every `element_size`-wide element in `buf`
///
/// A trailing partial element (never produced by the codec) is left as is.
/// Element sizes of 0 or 1 are a no-op.
pub fn flip_elements(buf: &mut [u8], element_size: usize) {
    if element_size < 2 {
        return;
    }
    for element in buf.chunks_exact_mut(element_size) {
        element.reverse();
    }
}

/// Copy `buf` with every element flipped
pub fn flipped_copy(buf: &[u8], element_size: usize) -> Vec<u8> {
    let mut out = buf.to_vec();
    flip_elements(&mut out, element_size);
    out
}
