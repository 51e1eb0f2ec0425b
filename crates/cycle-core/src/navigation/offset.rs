//! Index arithmetic for looped and bounded traversal

use crate::error::{CycleError, Result};

/// Compute `(reference + n) mod len`, always in `[0, len)`.
/// 
/// Uses true modulo, so negative offsets wrap from the end.
pub fn looped_offset(reference: usize, n: isize, len: usize) -> Result<usize> {
    looped_shift(reference, n as i128, len)
}

/// Compute `reference + n` if it lands inside `[0, len)`.
pub fn bounded_offset(reference: usize, n: isize, len: usize) -> Option<usize> {
    bounded_shift(reference, n as i128, len)
}

pub(crate) fn looped_shift(reference: usize, delta: i128, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(CycleError::EmptyCollection);
    }
    
    let target = (reference as i128 + delta).rem_euclid(len as i128);
    Ok(target as usize)
}

pub(crate) fn bounded_shift(reference: usize, delta: i128, len: usize) -> Option<usize> {
    let target = reference as i128 + delta;
    if (0..len as i128).contains(&target) {
        Some(target as usize)
    } else {
        None
    }
}
