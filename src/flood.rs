use crate::arena::QueuedPixel;
use crate::arrays::RGBImage;
use crate::common::Error;
use crate::distance::color_distance;
use crate::label::{Label, LabelGrid};
use crate::queue::BucketQueue;
use assume::assume;
use multiversion::multiversion;

/// Counters of one flood run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloodSummary {
    /// Number of pixels pushed into the bucket queue (every pixel at most once).
    pub num_pushed: usize,
    /// Interior pixels resolved as boundary.
    pub num_boundary: usize,
    /// Interior pixels never reached from any seed.
    pub num_unresolved: usize,
    /// Pushes whose priority did not fit into the bucket range.
    pub num_clamped: usize,
}

/// Grows the seed regions in `labels` over the whole image.
///
/// `labels` must contain the seeds as `Label::Region` and `Label::Unvisited` elsewhere. The outer
/// ring is overwritten with `Label::Boundary` and stays like that (see `boundary` module for the
/// correction), stale `InQueue`/`Boundary` cells inside are reset to `Unvisited`.
///
/// The steps are:
/// - every unvisited pixel touching a seed is queued with priority equal to the smallest color
///   distance to the touching seeds
/// - the lowest priority pixel is popped; if its labeled neighbors agree on one label it gets
///   the label, otherwise it becomes boundary
/// - unvisited neighbors of a newly labeled pixel are queued with priority
///   _round(color distance + bias)_ and bias increased by `compactness_step`
///
/// Pixels the flood never reaches stay `Unvisited` and are counted in
/// `FloodSummary::num_unresolved`.
pub fn flood(
    image: &RGBImage,
    labels: &mut LabelGrid,
    compactness_step: f32,
) -> Result<FloodSummary, Error> {
    if image.width != labels.width || image.height != labels.height {
        return Err(Error::DimensionMismatch);
    }
    if labels.width < 3 || labels.height < 3 {
        return Err(Error::ImageTooSmall(labels.width, labels.height));
    }
    if image.rgb_data.len() > u32::MAX as usize {
        return Err(Error::InvalidParameter("image size"));
    }
    if !compactness_step.is_finite() || compactness_step < 0f32 {
        return Err(Error::InvalidParameter("compactness_step"));
    }
    force_boundary_ring(labels);
    let mut queue = BucketQueue::new();
    let mut summary = FloodSummary::default();
    initialize_frontier(image, labels, &mut queue, &mut summary)?;
    grow(image, labels, &mut queue, compactness_step, &mut summary)?;
    summary.num_clamped = queue.num_clamped();
    summary.num_unresolved = labels.count(Label::Unvisited);
    Ok(summary)
}

fn force_boundary_ring(labels: &mut LabelGrid) {
    let height = labels.height;
    labels.get_row_mut(0).fill(Label::Boundary);
    labels.get_row_mut(height - 1).fill(Label::Boundary);
    for row in labels.data.chunks_exact_mut(labels.width) {
        row[0] = Label::Boundary;
        if let Some(last) = row.last_mut() {
            *last = Label::Boundary;
        }
    }
}

/// Label grid indices and image byte offsets of the left, right, upper and lower neighbor.
///
/// Only valid for interior pixels.
#[inline(always)]
fn neighbors(index: usize, offset: usize, width: usize) -> [(usize, usize); 4] {
    [
        (index - 1, offset - 3),
        (index + 1, offset + 3),
        (index - width, offset - 3 * width),
        (index + width, offset + 3 * width),
    ]
}

#[multiversion(targets = "simd")]
fn initialize_frontier(
    image: &RGBImage,
    labels: &mut LabelGrid,
    queue: &mut BucketQueue,
    summary: &mut FloodSummary,
) -> Result<(), Error> {
    let width = labels.width;
    for y in 1..labels.height - 1 {
        for x in 1..width - 1 {
            let index = labels.get_index(x, y);
            if matches!(labels.data[index], Label::InQueue | Label::Boundary) {
                labels.data[index] = Label::Unvisited;
            }
            if labels.data[index] != Label::Unvisited {
                continue;
            }
            let offset = image.get_index(x, y);
            let pixel = image.pixel_at(offset);
            let min_distance = neighbors(index, offset, width)
                .into_iter()
                .filter(|(n_index, _)| matches!(labels.data[*n_index], Label::Region(_)))
                .map(|(_, n_offset)| color_distance(pixel, image.pixel_at(n_offset)))
                .min();
            if let Some(distance) = min_distance {
                queue.push(
                    distance as i64,
                    QueuedPixel {
                        label_index: index as u32,
                        pixel_offset: offset as u32,
                        compactness_bias: 0f32,
                    },
                )?;
                labels.data[index] = Label::InQueue;
                summary.num_pushed += 1;
            }
        }
    }
    Ok(())
}

fn grow(
    image: &RGBImage,
    labels: &mut LabelGrid,
    queue: &mut BucketQueue,
    compactness_step: f32,
    summary: &mut FloodSummary,
) -> Result<(), Error> {
    let width = labels.width;
    let len = labels.data.len();
    while let Some(record) = queue.pop_lowest() {
        let index = record.label_index as usize;
        let offset = record.pixel_offset as usize;
        let pixel_neighbors = neighbors(index, offset, width);

        let mut resolved = Label::Unvisited;
        for (n_index, _) in pixel_neighbors {
            assume!(unsafe: n_index < len, "neighbor {n_index} of {index} out of {len}");
            if let Label::Region(label) = labels.data[n_index] {
                resolved = match resolved {
                    Label::Unvisited => Label::Region(label),
                    Label::Region(current) if current != label => Label::Boundary,
                    other => other,
                };
            }
        }
        debug_assert_ne!(
            resolved,
            Label::Unvisited,
            "pixel {index} was queued without a labeled neighbor"
        );
        labels.data[index] = resolved;
        if resolved == Label::Boundary {
            summary.num_boundary += 1;
            continue;
        }

        let pixel = image.pixel_at(offset);
        let bias = record.compactness_bias;
        for (n_index, n_offset) in pixel_neighbors {
            if labels.data[n_index] != Label::Unvisited {
                continue;
            }
            let distance = color_distance(pixel, image.pixel_at(n_offset));
            let level = queue.push(
                (distance as f32 + bias).round() as i64,
                QueuedPixel {
                    label_index: n_index as u32,
                    pixel_offset: n_offset as u32,
                    compactness_bias: bias + compactness_step,
                },
            )?;
            labels.data[n_index] = Label::InQueue;
            queue.lower_active(level);
            summary.num_pushed += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::flood;
    use crate::arrays::RGBImage;
    use crate::common::Error;
    use crate::label::{Label, LabelGrid};

    fn flat_image(width: usize, height: usize, value: u8) -> RGBImage {
        RGBImage::from_iter(
            std::iter::repeat(value).take(width * height * 3),
            width,
            height,
        )
        .unwrap()
    }

    /// Black up to column 3 (inclusive), white from column 4.
    fn edge_image() -> RGBImage {
        let dimg = image::RgbImage::from_fn(13, 7, |x, _| {
            if x <= 3 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        RGBImage::from_raw_slice(dimg.as_raw(), 13, 7).unwrap()
    }

    fn raw_rows(labels: &LabelGrid) -> Vec<Vec<i32>> {
        labels
            .to_raw()
            .data
            .chunks_exact(labels.width)
            .map(|r| r.to_vec())
            .collect()
    }

    #[test]
    fn two_seeds_flat_test() {
        let image = flat_image(6, 6, 128);
        let mut labels = LabelGrid::new(6, 6);
        labels[(1, 2)] = Label::Region(1);
        labels[(4, 2)] = Label::Region(2);
        let summary = flood(&image, &mut labels, 1f32).unwrap();
        let rows = raw_rows(&labels);
        assert_eq!(rows[0], vec![-1; 6]);
        assert_eq!(rows[5], vec![-1; 6]);
        for row in &rows[1..5] {
            assert_eq!(row, &vec![-1, 1, 1, -1, 2, -1]);
        }
        assert_eq!(summary.num_boundary, 4);
        assert_eq!(summary.num_unresolved, 0);
        assert_eq!(summary.num_pushed, 14);
        assert_eq!(summary.num_clamped, 0);
    }

    #[test]
    fn color_edge_stops_flood_test() {
        let image = edge_image();
        let mut labels = LabelGrid::new(13, 7);
        labels[(3, 3)] = Label::Region(1);
        labels[(9, 3)] = Label::Region(2);
        flood(&image, &mut labels, 0f32).unwrap();
        for row in &raw_rows(&labels)[1..6] {
            assert_eq!(row, &vec![-1, 1, 1, 1, -1, 2, 2, 2, 2, 2, 2, 2, -1]);
        }
    }

    #[test]
    fn compactness_crosses_color_edge_test() {
        let image = edge_image();
        let mut labels = LabelGrid::new(13, 7);
        labels[(3, 3)] = Label::Region(1);
        labels[(9, 3)] = Label::Region(2);
        let summary = flood(&image, &mut labels, 256f32).unwrap();
        for row in &raw_rows(&labels)[1..6] {
            assert_eq!(row, &vec![-1, 1, 1, 1, 1, 1, -1, 2, 2, 2, 2, 2, -1]);
        }
        assert_eq!(summary.num_clamped, 0);
    }

    #[test]
    fn clamped_priorities_test() {
        let image = flat_image(20, 20, 77);
        let mut labels = LabelGrid::new(20, 20);
        labels[(10, 10)] = Label::Region(1);
        let summary = flood(&image, &mut labels, 300f32).unwrap();
        assert!(summary.num_clamped > 0);
        assert_eq!(summary.num_boundary, 0);
        assert_eq!(labels.count(Label::Region(1)), 18 * 18);
    }

    #[test]
    fn no_seeds_test() {
        let image = flat_image(5, 4, 3);
        let mut labels = LabelGrid::new(5, 4);
        labels[(2, 1)] = Label::InQueue;
        labels[(3, 2)] = Label::Boundary;
        let summary = flood(&image, &mut labels, 1f32).unwrap();
        assert_eq!(summary.num_pushed, 0);
        assert_eq!(summary.num_unresolved, 6);
        assert_eq!(labels.count(Label::Boundary), 5 * 4 - 6);
    }

    #[test]
    fn flood_errors_test() {
        let image = flat_image(5, 4, 3);
        let mut labels = LabelGrid::new(4, 5);
        assert_eq!(
            flood(&image, &mut labels, 1f32),
            Err(Error::DimensionMismatch)
        );
        let mut labels = LabelGrid::new(5, 4);
        assert_eq!(
            flood(&image, &mut labels, -0.5),
            Err(Error::InvalidParameter("compactness_step"))
        );
    }
}
