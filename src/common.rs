use std::fmt::{Display, Formatter};

/// Above this `compactness_step` the computed priority levels routinely overflow the bucket range
/// and get clamped to the top level.
pub const LARGE_COMPACTNESS_STEP: f32 = 5.0;

/// How the seeds are distributed over the image when no explicit seed list is given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeedPlacement {
    /// Approximate number of seeds (superpixels). The grid spacing is derived from the image
    /// aspect ratio: _ny = sqrt(n * height / width)_, _nx = n / ny_.
    Count(u32),
    /// Explicit distance between seed rows and seed columns in pixels.
    Spacing { row_spacing: f32, col_spacing: f32 },
}

/// Main config for the segmentation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Seed grid used when no explicit seeds are passed to `segment()`.
    pub seed_placement: SeedPlacement,
    /// Priority increment added per hop away from the seed.
    ///
    /// Zero gives plain watershed following only the color gradient. Higher means more compact
    /// superpixels -> this is about trading boundary adherence for regular region sizes. Values
    /// above 5 are accepted, but the priorities get clamped to the last bucket and the ordering
    /// becomes coarser.
    pub compactness_step: f32,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            seed_placement: SeedPlacement::Count(2000),
            compactness_step: 1f32,
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> Result<Vec<Warning>, Error> {
        if !self.compactness_step.is_finite() || self.compactness_step < 0f32 {
            return Err(Error::InvalidParameter("compactness_step"));
        }
        let mut warnings = Vec::new();
        if self.compactness_step > LARGE_COMPACTNESS_STEP {
            warnings.push(Warning::LargeCompactnessStep(self.compactness_step));
        }
        Ok(warnings)
    }
}

#[derive(Debug, PartialEq)]
pub enum Error {
    /// Only 8-bit 3-channel images are supported.
    InvalidImageFormat { channels: usize },
    DimensionMismatch,
    /// Width and height must be at least 3 to have an interior.
    ImageTooSmall(usize, usize),
    InvalidParameter(&'static str),
    /// Arena block of this many records could not be allocated.
    AllocationFailure(usize),
}
impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidImageFormat { channels } => write!(
                f,
                "only 8-bit 3-channel images are supported, got {channels} channels"
            ),
            Error::DimensionMismatch => write!(f, "dimension mismatch"),
            Error::ImageTooSmall(width, height) => {
                write!(f, "image {width}x{height} is too small, minimum is 3x3")
            }
            Error::InvalidParameter(name) => write!(f, "invalid value of parameter {name}"),
            Error::AllocationFailure(records) => {
                write!(f, "allocation of {records} queue records failed")
            }
        }
    }
}
impl std::error::Error for Error {}

/// Non-fatal advisories of a run. They are logged and returned with the result.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// No seed was placed or some pixels were never reached by the flood.
    DegenerateInput { seeds: usize, unresolved: usize },
    /// `compactness_step` above `LARGE_COMPACTNESS_STEP`.
    LargeCompactnessStep(f32),
}
impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DegenerateInput { seeds, unresolved } => write!(
                f,
                "degenerate input: {seeds} seeds, {unresolved} pixels not reached by the flood"
            ),
            Warning::LargeCompactnessStep(step) => write!(
                f,
                "compactness step {step} is larger than {LARGE_COMPACTNESS_STEP}, priorities will be clamped"
            ),
        }
    }
}
