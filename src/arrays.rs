use crate::common::Error;
use aligned_vec::{AVec, ConstAlign};
use std::ops::{Index, IndexMut};

const ALIGN: usize = 64;

/// Row-major 2D array, element `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone)]
pub struct Array2D<T> {
    pub data: AVec<T, ConstAlign<ALIGN>>,
    pub width: usize,
    pub height: usize,
}

impl<T> Array2D<T> {
    pub fn from_slice(data: &[T], width: usize, height: usize) -> Result<Self, Error>
    where
        T: Clone,
    {
        if data.len() != width * height {
            return Err(Error::DimensionMismatch);
        }
        Ok(Self {
            width,
            height,
            data: AVec::from_slice(ALIGN, data),
        })
    }

    pub fn from_fill(value: T, width: usize, height: usize) -> Self
    where
        T: Clone + Copy,
    {
        let data: AVec<T, ConstAlign<ALIGN>> =
            AVec::from_iter(ALIGN, (0..width * height).map(|_| value));
        Self {
            width,
            height,
            data,
        }
    }

    pub fn get_row(&self, row: usize) -> &[T] {
        debug_assert!(row < self.height);
        &self.data[(self.width * row)..(self.width * row + self.width)]
    }
    pub fn get_row_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(row < self.height);
        &mut self.data[(self.width * row)..(self.width * row + self.width)]
    }
    #[inline(always)]
    pub fn get_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.width > x);
        debug_assert!(self.height > y);
        self.width * y + x
    }
    pub fn same_size<U>(&self, other: &Array2D<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
    /// Copies row `src` over row `dst`.
    pub fn copy_row(&mut self, src: usize, dst: usize)
    where
        T: Copy,
    {
        debug_assert!(src < self.height && dst < self.height);
        self.data
            .copy_within(self.width * src..self.width * src + self.width, self.width * dst);
    }
    /// Copies column `src` over column `dst`.
    pub fn copy_column(&mut self, src: usize, dst: usize)
    where
        T: Copy,
    {
        debug_assert!(src < self.width && dst < self.width);
        for row in self.data.chunks_exact_mut(self.width) {
            row[dst] = row[src];
        }
    }
}
impl<T> Index<(usize, usize)> for Array2D<T> {
    type Output = T;
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.data[self.get_index(x, y)]
    }
}
impl<T> IndexMut<(usize, usize)> for Array2D<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        let idx = self.get_index(x, y);
        &mut self.data[idx]
    }
}

/// Borrowed, not yet validated, interleaved 8-bit image. This is what callers hand over to
/// `segment()`.
#[derive(Clone, Copy, Debug)]
pub struct ImageRef<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl<'a> ImageRef<'a> {
    /// Packed RGB24 (the default layout of `image::RgbImage`).
    pub fn rgb(data: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
            channels: 3,
        }
    }

    /// Checks the format and the size without touching the data.
    pub fn validate(&self) -> Result<(), Error> {
        if self.channels != 3 {
            return Err(Error::InvalidImageFormat {
                channels: self.channels,
            });
        }
        if self.data.len() != self.width * self.height * 3 {
            return Err(Error::DimensionMismatch);
        }
        if self.width < 3 || self.height < 3 {
            return Err(Error::ImageTooSmall(self.width, self.height));
        }
        Ok(())
    }
}

/// Packed RGB24 pixel grid. The color channels are only compared, so any 3-channel 8-bit color
/// space works (BGR, Lab, ...).
pub struct RGBImage {
    pub rgb_data: AVec<u8, ConstAlign<ALIGN>>,
    pub width: usize,
    pub height: usize,
}

impl RGBImage {
    pub fn from_image_ref(image: ImageRef) -> Result<Self, Error> {
        image.validate()?;
        Ok(Self {
            width: image.width,
            height: image.height,
            rgb_data: AVec::from_slice(ALIGN, image.data),
        })
    }

    pub fn from_raw_slice(rgb_data: &[u8], width: usize, height: usize) -> Result<Self, Error> {
        Self::from_image_ref(ImageRef::rgb(rgb_data, width, height))
    }

    pub fn from_iter<I>(rgb_iter: I, width: usize, height: usize) -> Result<Self, Error>
    where
        I: IntoIterator<Item = u8>,
    {
        let rgb_data = AVec::from_iter(ALIGN, rgb_iter);
        if rgb_data.len() != width * height * 3 {
            return Err(Error::DimensionMismatch);
        }
        if width < 3 || height < 3 {
            return Err(Error::ImageTooSmall(width, height));
        }
        Ok(Self {
            width,
            height,
            rgb_data,
        })
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline(always)]
    pub fn get_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.width > x);
        debug_assert!(self.height > y);
        self.width * y * 3 + x * 3
    }
    /// Pixel at byte offset `offset` (see `get_index()`).
    #[inline(always)]
    pub fn pixel_at(&self, offset: usize) -> [u8; 3] {
        debug_assert!(offset + 3 <= self.rgb_data.len());
        [
            self.rgb_data[offset],
            self.rgb_data[offset + 1],
            self.rgb_data[offset + 2],
        ]
    }
}
