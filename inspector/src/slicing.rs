//! Feature map blocks.
//!
//! The provider stores a layer's feature maps as one flat sequence holding a
//! block of `fm_num` maps per input image, concatenated in input order. The
//! maps visible for input `k` are `[fm_num * k, fm_num * (k + 1))`, re-indexed
//! to `0..fm_num`. Every bound is checked against the real sequence length.

use std::ops::Range;

use crate::{
    error::{InspectErr, Result},
    input::InputSelector,
};

/// Returns the flat bounds of the block belonging to `input`.
///
/// # Errors
/// Returns `InspectErr::OutOfRange` if `fm_num` is 0 or the bounds overflow.
pub fn block_bounds(fm_num: usize, input: InputSelector) -> Result<Range<usize>> {
    let k = input.index();
    let out_of_range = || InspectErr::OutOfRange {
        what: "feature map block",
        index: k,
        len: fm_num,
    };

    if fm_num == 0 {
        return Err(out_of_range());
    }

    let start = fm_num.checked_mul(k).ok_or_else(out_of_range)?;
    let end = start.checked_add(fm_num).ok_or_else(out_of_range)?;
    Ok(start..end)
}

/// Returns the visible block of a layer's flat feature map sequence.
///
/// # Errors
/// Returns `InspectErr::AssetUnavailable` if `seq` is too short to hold the block.
pub fn visible_block<'a, T>(
    layer: &str,
    seq: &'a [T],
    fm_num: usize,
    input: InputSelector,
) -> Result<&'a [T]> {
    let bounds = block_bounds(fm_num, input)?;

    seq.get(bounds.clone())
        .ok_or_else(|| InspectErr::AssetUnavailable {
            layer: layer.to_string(),
            what: "feature maps",
            got: seq.len(),
            expected: bounds.end,
        })
}
