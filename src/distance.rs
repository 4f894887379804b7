/// Color dissimilarity of two pixels: the largest per-channel absolute difference (Chebyshev
/// distance).
///
/// The result is always in `0..=255`, which directly indexes the lower part of the bucket queue.
#[inline(always)]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> u8 {
    a[0].abs_diff(b[0])
        .max(a[1].abs_diff(b[1]))
        .max(a[2].abs_diff(b[2]))
}
