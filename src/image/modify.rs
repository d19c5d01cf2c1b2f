use egui::{Color32, ColorImage};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Minimum pixel count before parallelizing per-pixel work.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

/// One-shot filter applied to the primary image. Each filter button carries
/// exactly one of these, assigned once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modification {
    Rotate,
    Grayscale,
    Mirror,
    Invert,
    LeftSideMirror,
}

impl Modification {
    pub const ALL: [Self; 5] = [
        Self::Rotate,
        Self::Grayscale,
        Self::Mirror,
        Self::Invert,
        Self::LeftSideMirror,
    ];

    /// Button and row label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rotate => "Rotate",
            Self::Grayscale => "Grayscale",
            Self::Mirror => "Mirror",
            Self::Invert => "Invert",
            Self::LeftSideMirror => "Left mirror",
        }
    }

    /// Stable lowercase identifier, used for suggested file names.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Rotate => "rotate",
            Self::Grayscale => "grayscale",
            Self::Mirror => "mirror",
            Self::Invert => "invert",
            Self::LeftSideMirror => "left-mirror",
        }
    }

    /// What the filter does, for hover text.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Rotate => "Rotate 90° clockwise.",
            Self::Grayscale => "Convert to grayscale (Rec. 709 luma).",
            Self::Mirror => "Mirror left-right.",
            Self::Invert => "Invert every color channel.",
            Self::LeftSideMirror => "Reflect the left half onto the right.",
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn row_fraction(done: usize, height: usize) -> f32 {
    (done as f32 / height.max(1) as f32).clamp(0.0, 1.0)
}

/// Produce the output pixels row by row, reporting one progress step per
/// completed row. Rows are computed in parallel above the pixel threshold;
/// progress values may then arrive slightly out of order, so consumers keep
/// a running max.
fn map_output_rows(
    out_size: [usize; 2],
    progress: &(impl Fn(f32) + Sync),
    per_pixel: impl Fn(usize, usize) -> Color32 + Sync,
) -> Vec<Color32> {
    let [width, height] = out_size;
    let rows_done = AtomicUsize::new(0);
    let report_row = || {
        let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
        progress(row_fraction(done, height));
    };

    if width * height >= PARALLEL_PIXEL_THRESHOLD {
        (0..height)
            .into_par_iter()
            .flat_map_iter(|y| {
                let row: Vec<Color32> = (0..width).map(|x| per_pixel(x, y)).collect();
                report_row();
                row
            })
            .collect()
    } else {
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                out.push(per_pixel(x, y));
            }
            report_row();
        }
        out
    }
}

fn grayscale_pixel(color: Color32) -> Color32 {
    let [r, g, b, a] = color.to_array();
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let v = luma.round().clamp(0.0, 255.0) as u8;
    Color32::from_rgba_unmultiplied(v, v, v, a)
}

fn invert_pixel(color: Color32) -> Color32 {
    let [r, g, b, a] = color.to_array();
    Color32::from_rgba_unmultiplied(255 - r, 255 - g, 255 - b, a)
}

/// Apply a modification to `base`, returning a new image. The input is never
/// mutated. `progress` receives normalized fractions in [0,1] and is invoked
/// with 1.0 by the time the result is ready.
pub fn apply_modification(
    base: &ColorImage,
    modification: Modification,
    progress: &(impl Fn(f32) + Sync),
) -> ColorImage {
    let [w, h] = base.size;
    if w == 0 || h == 0 {
        progress(1.0);
        return base.clone();
    }
    let px = &base.pixels;

    match modification {
        Modification::Rotate => {
            // Output (x, y) samples the source column y, counted from the
            // bottom row up.
            let out_size = [h, w];
            let nw = h;
            let pixels = map_output_rows(out_size, progress, |x, y| px[(nw - 1 - x) * w + y]);
            ColorImage::new(out_size, pixels)
        }
        Modification::Grayscale => {
            let pixels = map_output_rows(base.size, progress, |x, y| grayscale_pixel(px[y * w + x]));
            ColorImage::new(base.size, pixels)
        }
        Modification::Mirror => {
            let pixels = map_output_rows(base.size, progress, |x, y| px[y * w + (w - 1 - x)]);
            ColorImage::new(base.size, pixels)
        }
        Modification::Invert => {
            let pixels = map_output_rows(base.size, progress, |x, y| invert_pixel(px[y * w + x]));
            ColorImage::new(base.size, pixels)
        }
        Modification::LeftSideMirror => {
            // min(x, w-1-x) keeps the left half and reflects it onto the
            // right; odd widths keep the center column.
            let pixels = map_output_rows(base.size, progress, |x, y| px[y * w + x.min(w - 1 - x)]);
            ColorImage::new(base.size, pixels)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn color_id(id: u8) -> Color32 {
        Color32::from_rgb(id, 0, 0)
    }

    fn ids_from_image(image: &ColorImage) -> Vec<u8> {
        image
            .pixels
            .iter()
            .map(|c| c.to_srgba_unmultiplied()[0])
            .collect()
    }

    fn image_from_ids(size: [usize; 2], ids: &[u8]) -> ColorImage {
        ColorImage::new(size, ids.iter().map(|&id| color_id(id)).collect())
    }

    fn no_progress(_: f32) {}

    #[test]
    fn rotate_maps_pixels_and_swaps_dimensions() {
        let base = image_from_ids([3, 2], &[1, 2, 3, 4, 5, 6]);
        let out = apply_modification(&base, Modification::Rotate, &no_progress);
        assert_eq!(out.size, [2, 3]);
        assert_eq!(ids_from_image(&out), vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn mirror_reverses_each_row() {
        let base = image_from_ids([3, 2], &[1, 2, 3, 4, 5, 6]);
        let out = apply_modification(&base, Modification::Mirror, &no_progress);
        assert_eq!(out.size, [3, 2]);
        assert_eq!(ids_from_image(&out), vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn left_mirror_reflects_left_half_even_width() {
        let base = image_from_ids([4, 1], &[1, 2, 3, 4]);
        let out = apply_modification(&base, Modification::LeftSideMirror, &no_progress);
        assert_eq!(out.size, [4, 1]);
        assert_eq!(ids_from_image(&out), vec![1, 2, 2, 1]);
    }

    #[test]
    fn left_mirror_keeps_center_column_odd_width() {
        let base = image_from_ids([5, 1], &[1, 2, 3, 4, 5]);
        let out = apply_modification(&base, Modification::LeftSideMirror, &no_progress);
        assert_eq!(ids_from_image(&out), vec![1, 2, 3, 2, 1]);
    }

    #[test]
    fn invert_flips_channels_and_keeps_alpha() {
        let base = ColorImage::new([1, 1], vec![Color32::from_rgb(10, 20, 30)]);
        let out = apply_modification(&base, Modification::Invert, &no_progress);
        assert_eq!(
            out.pixels[0].to_srgba_unmultiplied(),
            [245, 235, 225, 255]
        );
    }

    #[test]
    fn grayscale_uses_rec709_luma() {
        let base = ColorImage::new(
            [3, 1],
            vec![
                Color32::from_rgb(255, 0, 0),
                Color32::from_rgb(0, 255, 0),
                Color32::from_rgb(0, 0, 255),
            ],
        );
        let out = apply_modification(&base, Modification::Grayscale, &no_progress);
        let grays: Vec<u8> = out
            .pixels
            .iter()
            .map(|c| c.to_srgba_unmultiplied()[0])
            .collect();
        assert_eq!(grays, vec![54, 182, 18]);
        // All three channels match on every output pixel.
        for c in &out.pixels {
            let [r, g, b, _] = c.to_srgba_unmultiplied();
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    #[test]
    fn single_pixel_image_is_its_own_mirror() {
        let base = image_from_ids([1, 1], &[7]);
        let out = apply_modification(&base, Modification::Mirror, &no_progress);
        assert_eq!(ids_from_image(&out), vec![7]);
    }

    #[test]
    fn progress_is_monotonic_and_reaches_one() {
        let base = image_from_ids([2, 4], &[1, 2, 3, 4, 5, 6, 7, 8]);
        let seen = Mutex::new(Vec::new());
        let _ = apply_modification(&base, Modification::Invert, &|f| {
            seen.lock().expect("progress lock").push(f);
        });
        let seen = seen.into_inner().expect("progress lock");
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|f| (0.0..=1.0).contains(f)));
        assert_eq!(seen.last().copied(), Some(1.0));
    }

    #[test]
    fn empty_image_reports_done_without_work() {
        let base = ColorImage::new([0, 0], Vec::new());
        let seen = Mutex::new(Vec::new());
        let out = apply_modification(&base, Modification::Grayscale, &|f| {
            seen.lock().expect("progress lock").push(f);
        });
        assert_eq!(out.size, [0, 0]);
        assert_eq!(seen.into_inner().expect("progress lock").as_slice(), &[1.0]);
    }
}
