//! Ordered list of processed results, one row per applied modification.

use crate::image::{LoadedImage, Modification};
use egui::{ColorImage, Context};

/// A filtered result kept in the on-screen list.
pub struct ProcessedImage {
    pub modification: Modification,
    pub image: LoadedImage,
}

/// Whether a completed modification created a new row or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    Inserted,
    Updated,
}

/// The result list. Rows are index-addressable and keep insertion order; the
/// gallery is mutated only from the UI thread.
#[derive(Default)]
pub struct Gallery {
    entries: Vec<ProcessedImage>,
}

impl Gallery {
    /// Add the result for `modification`, replacing the existing row for the
    /// same kind when there is one. Exactly one row changes.
    pub fn upsert(
        &mut self,
        ctx: &Context,
        modification: Modification,
        pixels: ColorImage,
    ) -> (usize, UpsertMode) {
        if let Some(index) = self.index_of(modification) {
            self.entries[index].image.replace_pixels(pixels);
            (index, UpsertMode::Updated)
        } else {
            let texture_name = format!("result_{}", modification.slug());
            let image = LoadedImage::from_color_image(ctx, &texture_name, pixels);
            self.entries.push(ProcessedImage {
                modification,
                image,
            });
            (self.entries.len() - 1, UpsertMode::Inserted)
        }
    }

    /// Remove exactly the row at `index`; out-of-range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<ProcessedImage> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&ProcessedImage> {
        self.entries.get(index)
    }

    pub fn index_of(&self, modification: Modification) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.modification == modification)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessedImage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn pixels(id: u8) -> ColorImage {
        ColorImage::new([1, 1], vec![Color32::from_rgb(id, 0, 0)])
    }

    fn first_channel(gallery: &Gallery, index: usize) -> u8 {
        gallery.get(index).expect("row exists").image.pixels.pixels[0].to_srgba_unmultiplied()[0]
    }

    #[test]
    fn new_kinds_append_in_order() {
        let ctx = Context::default();
        let mut gallery = Gallery::default();
        assert_eq!(
            gallery.upsert(&ctx, Modification::Grayscale, pixels(1)),
            (0, UpsertMode::Inserted)
        );
        assert_eq!(
            gallery.upsert(&ctx, Modification::Invert, pixels(2)),
            (1, UpsertMode::Inserted)
        );
        assert_eq!(gallery.len(), 2);
        assert_eq!(
            gallery.iter().map(|e| e.modification).collect::<Vec<_>>(),
            vec![Modification::Grayscale, Modification::Invert]
        );
    }

    #[test]
    fn repeated_kind_updates_the_same_row() {
        let ctx = Context::default();
        let mut gallery = Gallery::default();
        gallery.upsert(&ctx, Modification::Mirror, pixels(1));
        gallery.upsert(&ctx, Modification::Rotate, pixels(2));
        let (index, mode) = gallery.upsert(&ctx, Modification::Mirror, pixels(9));
        assert_eq!((index, mode), (0, UpsertMode::Updated));
        assert_eq!(gallery.len(), 2);
        assert_eq!(first_channel(&gallery, 0), 9);
    }

    #[test]
    fn remove_deletes_exactly_one_row() {
        let ctx = Context::default();
        let mut gallery = Gallery::default();
        gallery.upsert(&ctx, Modification::Grayscale, pixels(1));
        gallery.upsert(&ctx, Modification::Invert, pixels(2));
        gallery.upsert(&ctx, Modification::Rotate, pixels(3));

        let removed = gallery.remove(1).expect("row removed");
        assert_eq!(removed.modification, Modification::Invert);
        assert_eq!(gallery.len(), 2);
        assert_eq!(
            gallery.iter().map(|e| e.modification).collect::<Vec<_>>(),
            vec![Modification::Grayscale, Modification::Rotate]
        );
    }

    #[test]
    fn out_of_range_remove_is_a_no_op() {
        let ctx = Context::default();
        let mut gallery = Gallery::default();
        gallery.upsert(&ctx, Modification::Grayscale, pixels(1));
        assert!(gallery.remove(5).is_none());
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn rotate_update_replaces_dimensions_too() {
        let ctx = Context::default();
        let mut gallery = Gallery::default();
        gallery.upsert(&ctx, Modification::Rotate, pixels(1));
        let tall = ColorImage::new(
            [1, 2],
            vec![Color32::from_rgb(4, 0, 0), Color32::from_rgb(5, 0, 0)],
        );
        gallery.upsert(&ctx, Modification::Rotate, tall);
        assert_eq!(gallery.get(0).expect("row").image.size, [1, 2]);
    }
}
