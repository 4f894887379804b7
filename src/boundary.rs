use crate::arrays::Array2D;
use crate::label::Label;
use multiversion::multiversion;

/// Value of boundary pixels in the boundary map.
pub const BOUNDARY_ON: u8 = 255;
pub const BOUNDARY_OFF: u8 = 0;

/// Converts raw labels (output of `LabelGrid::to_raw()`) to a binary boundary map.
///
/// Boundary pixels (negative labels) are `BOUNDARY_ON`, the rest `BOUNDARY_OFF`. The flood marks
/// the whole outer ring as boundary, so the ring is replaced by its inner neighbor rows and
/// columns afterward.
#[multiversion(targets = "simd")]
pub fn extract_boundary(labels: &Array2D<i32>) -> Array2D<u8> {
    let mut boundary = Array2D::from_fill(BOUNDARY_OFF, labels.width, labels.height);
    write_boundary(labels, &mut boundary);
    boundary
}

pub(crate) fn write_boundary(labels: &Array2D<i32>, boundary: &mut Array2D<u8>) {
    debug_assert!(labels.same_size(boundary));
    for (out, label) in boundary.data.iter_mut().zip(labels.data.iter()) {
        *out = if *label == Label::RAW_BOUNDARY || *label == Label::RAW_IN_QUEUE {
            BOUNDARY_ON
        } else {
            BOUNDARY_OFF
        };
    }
    correct_border(boundary);
}

/// Copies row 1 over row 0, row H-2 over row H-1, then column 1 over column 0 and column W-2 over
/// column W-1.
///
/// Used for both the boundary map and the raw label output, so each border pixel reports the
/// segmentation of its interior neighbor.
pub fn correct_border<T: Copy>(grid: &mut Array2D<T>) {
    if grid.width < 3 || grid.height < 3 {
        return;
    }
    let (width, height) = (grid.width, grid.height);
    grid.copy_row(1, 0);
    grid.copy_row(height - 2, height - 1);
    grid.copy_column(1, 0);
    grid.copy_column(width - 2, width - 1);
}

/// Border correction of the raw label output, see `correct_border()`.
pub fn correct_label_border(labels: &mut Array2D<i32>) {
    correct_border(labels)
}

#[cfg(test)]
mod tests {
    use super::{correct_label_border, extract_boundary, BOUNDARY_OFF, BOUNDARY_ON};
    use crate::arrays::Array2D;

    #[rustfmt::skip]
    const RAW: [i32; 5 * 4] = [
        -1, -1, -1, -1, -1,
        -1,  1, -1,  2, -1,
        -1,  1,  1, -1, -1,
        -1, -1, -1, -1, -1,
    ];

    #[test]
    fn extract_boundary_test() {
        let labels = Array2D::from_slice(&RAW, 5, 4).unwrap();
        let boundary = extract_boundary(&labels);
        let on = BOUNDARY_ON;
        let off = BOUNDARY_OFF;
        #[rustfmt::skip]
        let expected = [
            off, off, on, off, off,
            off, off, on, off, off,
            off, off, off, on, on,
            off, off, off, on, on,
        ];
        assert_eq!(boundary.data.as_slice(), &expected);
    }

    #[test]
    fn border_rows_and_columns_match_neighbors_test() {
        let labels = Array2D::from_slice(&RAW, 5, 4).unwrap();
        let boundary = extract_boundary(&labels);
        assert_eq!(boundary.get_row(0), boundary.get_row(1));
        assert_eq!(boundary.get_row(3), boundary.get_row(2));
        for row in boundary.data.chunks_exact(5) {
            assert_eq!(row[0], row[1]);
            assert_eq!(row[4], row[3]);
        }
    }

    #[test]
    fn correct_label_border_test() {
        let mut labels = Array2D::from_slice(&RAW, 5, 4).unwrap();
        correct_label_border(&mut labels);
        #[rustfmt::skip]
        let expected = [
            1, 1, -1, 2, 2,
            1, 1, -1, 2, 2,
            1, 1,  1, -1, -1,
            1, 1,  1, -1, -1,
        ];
        assert_eq!(labels.data.as_slice(), &expected);
    }
}
