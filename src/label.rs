use crate::arrays::Array2D;

/// State of one label grid cell.
///
/// The raw `i32` encoding (`to_raw()`/`from_raw()`) is the output format: `0` unvisited, `-1`
/// boundary, `-2` in queue and positive numbers are region labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Label {
    /// Not reached by the flood (yet).
    #[default]
    Unvisited,
    /// Pushed into the bucket queue, waiting to be resolved.
    InQueue,
    /// Resolved as a boundary between two or more regions. Also the forced outer ring.
    Boundary,
    /// Resolved region, the number is the seed label (starting from 1).
    Region(u32),
}

impl Label {
    pub const RAW_UNVISITED: i32 = 0;
    pub const RAW_BOUNDARY: i32 = -1;
    pub const RAW_IN_QUEUE: i32 = -2;

    #[inline(always)]
    pub fn to_raw(self) -> i32 {
        match self {
            Label::Unvisited => Self::RAW_UNVISITED,
            Label::InQueue => Self::RAW_IN_QUEUE,
            Label::Boundary => Self::RAW_BOUNDARY,
            Label::Region(label) => i32::try_from(label).unwrap_or(i32::MAX),
        }
    }

    /// Unknown negative values are treated as boundary.
    #[inline(always)]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_UNVISITED => Label::Unvisited,
            Self::RAW_IN_QUEUE => Label::InQueue,
            label if label > 0 => Label::Region(label as u32),
            _ => Label::Boundary,
        }
    }

    #[inline(always)]
    pub fn region(self) -> Option<u32> {
        match self {
            Label::Region(label) => Some(label),
            _ => None,
        }
    }
}

pub type LabelGrid = Array2D<Label>;

impl LabelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Array2D::from_fill(Label::Unvisited, width, height)
    }

    pub fn to_raw(&self) -> Array2D<i32> {
        let mut raw = Array2D::from_fill(Label::RAW_UNVISITED, self.width, self.height);
        self.write_raw(&mut raw);
        raw
    }

    pub(crate) fn write_raw(&self, raw: &mut Array2D<i32>) {
        debug_assert!(self.same_size(raw));
        for (out, label) in raw.data.iter_mut().zip(self.data.iter()) {
            *out = label.to_raw();
        }
    }

    pub fn from_raw(raw: &Array2D<i32>) -> Self {
        let mut labels = Self::new(raw.width, raw.height);
        for (label, value) in labels.data.iter_mut().zip(raw.data.iter()) {
            *label = Label::from_raw(*value);
        }
        labels
    }

    pub fn count(&self, state: Label) -> usize {
        self.data.iter().filter(|l| **l == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Label, LabelGrid};
    use crate::arrays::Array2D;

    #[test]
    fn raw_encoding_test() {
        assert_eq!(Label::Unvisited.to_raw(), 0);
        assert_eq!(Label::Boundary.to_raw(), -1);
        assert_eq!(Label::InQueue.to_raw(), -2);
        assert_eq!(Label::Region(17).to_raw(), 17);
        assert_eq!(Label::from_raw(-7), Label::Boundary);
        assert_eq!(Label::from_raw(3).region(), Some(3));
        assert_eq!(Label::Boundary.region(), None);
    }

    #[test]
    fn label_grid_raw_test() {
        let raw = Array2D::from_slice(&[0, -1, -2, 4, 5, 0], 3, 2).unwrap();
        let labels = LabelGrid::from_raw(&raw);
        assert_eq!(labels[(2, 0)], Label::InQueue);
        assert_eq!(labels[(0, 1)], Label::Region(4));
        assert_eq!(labels.count(Label::Unvisited), 2);
        assert_eq!(labels.to_raw().data.as_slice(), raw.data.as_slice());
    }
}
