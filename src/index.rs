//! Row-major index arithmetic for N-dimensional arrays stored flat.
//!
//! The last dimension is contiguous: the stride of dimension `i` is the
//! product of the extents of all dimensions after it.

/// Total number of elements in an array of the given `shape`, or `None` if
/// it overflows `usize`.
pub fn size(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1_usize, |acc, &n| acc.checked_mul(n))
}

/// Row-major strides of an array of the given `shape`, or `None` if the total
/// size overflows `usize`.
pub fn strides(shape: &[usize]) -> Option<Vec<usize>> {
    size(shape)?;
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    Some(strides)
}

/// Per-dimension indices to flat offset. `None` if the number of indices
/// differs from the number of dimensions, or any index is out of range.
pub fn ravel(bins: &[usize], shape: &[usize]) -> Option<usize> {
    if bins.len() != shape.len() { return None }
    bins.iter().zip(shape).try_fold(0, |offset, (&b, &n)| {
        if b < n { Some(offset * n + b) } else { None }
    })
}

/// Flat offset to per-dimension indices. `None` if `offset` lies beyond the
/// end of the array.
pub fn unravel(mut offset: usize, shape: &[usize]) -> Option<Vec<usize>> {
    if offset >= size(shape)? { return None }
    let mut bins = vec![0; shape.len()];
    for (bin, &n) in bins.iter_mut().zip(shape).rev() {
        *bin    = offset % n;
        offset /= n;
    }
    Some(bins)
}
