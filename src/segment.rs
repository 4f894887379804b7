use crate::arrays::{Array2D, ImageRef, RGBImage};
use crate::boundary::{correct_label_border, write_boundary, BOUNDARY_OFF};
use crate::common::{Config, Error, Warning};
use crate::flood::{flood, FloodSummary};
use crate::label::{Label, LabelGrid};
use crate::seeds::{place_seeds, SeedPoint};

/// What happened during one `segment()` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReport {
    /// `(row, col)` of every seed, seed `i` has label `i + 1`.
    pub seeds: Vec<(usize, usize)>,
    pub flood: FloodSummary,
    pub warnings: Vec<Warning>,
}

impl SegmentReport {
    /// No seeds or pixels which don't belong to any region nor boundary.
    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::DegenerateInput { .. }))
    }
}

pub struct Segmentation {
    /// Region label of every pixel, `-1` for boundary pixels and `0` for pixels no seed reached.
    ///
    /// Every pixel is in a region or on the boundary, except the unresolved ones counted in
    /// `FloodSummary::num_unresolved`: pixels without seeds around, and interior pixels whose four
    /// neighbors all became boundary before the pixel was queued. Those have label `0` and
    /// `BOUNDARY_OFF`.
    pub labels: Array2D<i32>,
    /// `BOUNDARY_ON` on boundary pixels, `BOUNDARY_OFF` elsewhere.
    pub boundary: Array2D<u8>,
    pub report: SegmentReport,
}

/// Compact watershed segmentation of `image`.
///
/// Seeds are taken from `seeds` if given, otherwise placed on a grid by
/// `config.seed_placement`. The image is validated before anything is allocated.
pub fn segment(
    image: ImageRef,
    config: &Config,
    seeds: Option<&[SeedPoint]>,
) -> Result<Segmentation, Error> {
    image.validate()?;
    config.validate()?;
    let mut labels = Array2D::from_fill(Label::RAW_UNVISITED, image.width, image.height);
    let mut boundary = Array2D::from_fill(BOUNDARY_OFF, image.width, image.height);
    let report = segment_into(image, config, seeds, &mut labels, &mut boundary)?;
    Ok(Segmentation {
        labels,
        boundary,
        report,
    })
}

/// Same as `segment()`, but writes into caller-owned `labels` and `boundary`.
///
/// On error both outputs are left untouched.
pub fn segment_into(
    image: ImageRef,
    config: &Config,
    seeds: Option<&[SeedPoint]>,
    labels: &mut Array2D<i32>,
    boundary: &mut Array2D<u8>,
) -> Result<SegmentReport, Error> {
    image.validate()?;
    let mut warnings = config.validate()?;
    if labels.width != image.width
        || labels.height != image.height
        || !labels.same_size(boundary)
    {
        return Err(Error::DimensionMismatch);
    }
    let rgb_image = RGBImage::from_image_ref(image)?;
    let mut grid = LabelGrid::new(image.width, image.height);
    let seed_positions = place_seeds(&mut grid, &config.seed_placement, seeds)?;
    let flood_summary = flood(&rgb_image, &mut grid, config.compactness_step)?;

    if seed_positions.is_empty() || flood_summary.num_unresolved > 0 {
        warnings.push(Warning::DegenerateInput {
            seeds: seed_positions.len(),
            unresolved: flood_summary.num_unresolved,
        });
    }
    for warning in &warnings {
        log::warn!("{warning}");
    }
    log::debug!(
        "segmented {}x{} image: {} seeds, {} pushed, {} boundary, {} clamped",
        image.width,
        image.height,
        seed_positions.len(),
        flood_summary.num_pushed,
        flood_summary.num_boundary,
        flood_summary.num_clamped
    );

    grid.write_raw(labels);
    write_boundary(labels, boundary);
    correct_label_border(labels);
    Ok(SegmentReport {
        seeds: seed_positions,
        flood: flood_summary,
        warnings,
    })
}
