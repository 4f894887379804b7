use crate::common::{Error, SeedPlacement};
use crate::label::{Label, LabelGrid};

/// Explicit seed position in pixel coordinates. It's rounded to the nearest pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedPoint {
    pub row: f32,
    pub col: f32,
}

impl SeedPoint {
    pub fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }
}

/// Writes seeds into `labels` and returns their `(row, col)` positions.
///
/// The seed at position `i` of the returned list has label `i + 1`. Explicit `points` take
/// precedence over `placement`.
pub fn place_seeds(
    labels: &mut LabelGrid,
    placement: &SeedPlacement,
    points: Option<&[SeedPoint]>,
) -> Result<Vec<(usize, usize)>, Error> {
    match (points, placement) {
        (Some(points), _) => Ok(from_points(labels, points)),
        (None, SeedPlacement::Count(num_seeds)) => grid_by_count(labels, *num_seeds),
        (None, SeedPlacement::Spacing {
            row_spacing,
            col_spacing,
        }) => grid_by_spacing(labels, *row_spacing, *col_spacing),
    }
}

/// Regular grid of approximately `num_seeds` seeds, spacing follows the image aspect ratio.
pub fn grid_by_count(
    labels: &mut LabelGrid,
    num_seeds: u32,
) -> Result<Vec<(usize, usize)>, Error> {
    if num_seeds == 0 {
        return Ok(Vec::new());
    }
    let width = labels.width as f32;
    let height = labels.height as f32;
    let n_y = (num_seeds as f32 * height / width).sqrt();
    let n_x = num_seeds as f32 / n_y;
    // More seeds than pixels just fills every pixel.
    grid_by_spacing(labels, (height / n_y).max(1f32), (width / n_x).max(1f32))
}

/// Regular grid with seeds in the centers of `row_spacing` x `col_spacing` cells.
pub fn grid_by_spacing(
    labels: &mut LabelGrid,
    row_spacing: f32,
    col_spacing: f32,
) -> Result<Vec<(usize, usize)>, Error> {
    if !row_spacing.is_finite() || row_spacing < 1f32 {
        return Err(Error::InvalidParameter("row_spacing"));
    }
    if !col_spacing.is_finite() || col_spacing < 1f32 {
        return Err(Error::InvalidParameter("col_spacing"));
    }
    let mut positions = Vec::new();
    for i in grid_positions(row_spacing, labels.height) {
        for j in grid_positions(col_spacing, labels.width) {
            let row = clamp_interior(i.floor(), labels.height);
            let column = clamp_interior(j.floor(), labels.width);
            place(labels, &mut positions, row, column);
        }
    }
    Ok(positions)
}

/// Cell centers `spacing / 2 + k * spacing` below `length`.
fn grid_positions(spacing: f32, length: usize) -> impl Iterator<Item = f64> {
    let spacing = spacing as f64;
    (0u64..)
        .map(move |k| spacing / 2f64 + k as f64 * spacing)
        .take_while(move |position| *position < length as f64)
}

/// Seeds in the order of `points`.
pub fn from_points(labels: &mut LabelGrid, points: &[SeedPoint]) -> Vec<(usize, usize)> {
    let mut positions = Vec::with_capacity(points.len());
    for point in points {
        let row = clamp_interior(point.row.round() as f64, labels.height);
        let column = clamp_interior(point.col.round() as f64, labels.width);
        place(labels, &mut positions, row, column);
    }
    positions
}

#[inline]
fn clamp_interior(value: f64, length: usize) -> usize {
    debug_assert!(length >= 3);
    (value as i64).clamp(1, length as i64 - 2) as usize
}

/// A seed placed on an already seeded pixel replaces it, the earlier label then has no pixel.
fn place(labels: &mut LabelGrid, positions: &mut Vec<(usize, usize)>, row: usize, column: usize) {
    let label = positions.len() as u32 + 1;
    if let Label::Region(previous) = labels[(column, row)] {
        log::debug!("seed {label} at ({row}, {column}) replaces seed {previous}");
    }
    labels[(column, row)] = Label::Region(label);
    positions.push((row, column));
}
