use crate::arrays::Array2D;
use multiversion::multiversion;

/// Superpixel summary computed from a finished label map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Region {
    /// Label of the region (seed label, starting from 1)
    pub label: u32,
    /// Number of pixels with this label
    pub num_members: u32,
    /// x position of centroid (column), rounded
    pub x: u32,
    /// y position of centroid (row), rounded
    pub y: u32,
}

/// Collects `Region` for every label in `1..=num_labels`.
///
/// Boundary and unvisited pixels (non-positive labels) and labels above `num_labels` are skipped.
/// Regions without pixels are kept with `num_members == 0`.
#[multiversion(targets = "simd")]
pub fn compute_regions(labels: &Array2D<i32>, num_labels: usize) -> Vec<Region> {
    let mut acc: Vec<[u64; 3]> = vec![[0, 0, 0]; num_labels + 1];
    for (row, labels_row) in labels.data.chunks_exact(labels.width).enumerate() {
        for (column, label) in labels_row.iter().enumerate() {
            if *label <= 0 || *label as usize > num_labels {
                continue;
            }
            let a = &mut acc[*label as usize];
            a[0] += 1;
            a[1] += column as u64;
            a[2] += row as u64;
        }
    }
    acc.into_iter()
        .enumerate()
        .skip(1)
        .map(|(label, [members, sum_x, sum_y])| {
            let half = members / 2;
            let (x, y) = if members == 0 {
                (0, 0)
            } else {
                ((sum_x + half) / members, (sum_y + half) / members)
            };
            Region {
                label: label as u32,
                num_members: members as u32,
                x: x as u32,
                y: y as u32,
            }
        })
        .collect()
}

/// Coefficient of variation of region sizes (standard deviation / mean).
///
/// Lower is more regular. Zero for no regions or no members.
pub fn size_variation(regions: &[Region]) -> f32 {
    if regions.is_empty() {
        return 0f32;
    }
    let n = regions.len() as f64;
    let mean = regions.iter().map(|r| r.num_members as f64).sum::<f64>() / n;
    if mean == 0f64 {
        return 0f32;
    }
    let variance = regions
        .iter()
        .map(|r| (r.num_members as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (variance.sqrt() / mean) as f32
}

#[cfg(test)]
mod tests {
    use super::{compute_regions, size_variation, Region};
    use crate::arrays::Array2D;

    #[test]
    fn compute_regions_test() {
        #[rustfmt::skip]
        let labels = Array2D::from_slice(&[
            1, 1, -1, 2,
            1, 1, -1, 2,
            0, 1, -1, 2,
        ], 4, 3).unwrap();
        let regions = compute_regions(&labels, 3);
        assert_eq!(regions.len(), 3);
        assert_eq!(
            regions[0],
            Region {
                label: 1,
                num_members: 5,
                x: 1,
                y: 1
            }
        );
        assert_eq!(regions[1].num_members, 3);
        assert_eq!((regions[1].x, regions[1].y), (3, 1));
        assert_eq!(regions[2].num_members, 0);
    }

    #[test]
    fn size_variation_test() {
        let region = |num_members| Region {
            num_members,
            ..Region::default()
        };
        assert_eq!(size_variation(&[]), 0f32);
        assert_eq!(size_variation(&[region(10), region(10)]), 0f32);
        let cv = size_variation(&[region(28), region(56)]);
        assert!((cv - 1f32 / 3f32).abs() < 1e-6);
    }
}
