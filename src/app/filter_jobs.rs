use super::{FilterEvent, FilterJob, FilterdeckApp};
use crate::gallery::UpsertMode;
use crate::image::{Modification, apply_modification};
use egui::{ColorImage, Context};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

impl FilterdeckApp {
    pub(crate) fn has_running_job(&self, modification: Modification) -> bool {
        self.filter_jobs
            .iter()
            .any(|job| job.modification == modification)
    }

    pub(crate) fn job_progress(&self, modification: Modification) -> Option<f32> {
        self.filter_jobs
            .iter()
            .find(|job| job.modification == modification)
            .map(|job| job.progress)
    }

    /// Kick off a filter against a snapshot of the current primary pixels.
    /// Replacing the primary image later never changes what this job
    /// computes; its result still lands in the list.
    pub(crate) fn request_modification(&mut self, modification: Modification) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        if self.has_running_job(modification) {
            return;
        }
        let pixels = image.pixels.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = apply_modification(&pixels, modification, &move |fraction| {
                let _ = progress_tx.send(FilterEvent::Progress(fraction));
            });
            let _ = tx.send(FilterEvent::Done(result));
        });
        self.filter_jobs.push(FilterJob {
            modification,
            rx,
            progress: 0.0,
        });
        self.set_status(format!("Applying {}…", modification.label().to_lowercase()));
    }

    pub(crate) fn poll_filter_jobs(&mut self, ctx: &Context) {
        let mut completed: Vec<(Modification, ColorImage)> = Vec::new();
        let mut failed: Vec<Modification> = Vec::new();

        self.filter_jobs.retain_mut(|job| {
            loop {
                match job.rx.try_recv() {
                    Ok(FilterEvent::Progress(fraction)) => {
                        // Parallel rows may report slightly out of order.
                        job.progress = job.progress.max(fraction);
                    }
                    Ok(FilterEvent::Done(pixels)) => {
                        completed.push((job.modification, pixels));
                        return false;
                    }
                    Err(TryRecvError::Empty) => return true,
                    Err(TryRecvError::Disconnected) => {
                        failed.push(job.modification);
                        return false;
                    }
                }
            }
        });

        for (modification, pixels) in completed {
            let (index, mode) = self.gallery.upsert(ctx, modification, pixels);
            let status = match mode {
                UpsertMode::Inserted => {
                    format!("{} added to results (row {}).", modification.label(), index + 1)
                }
                UpsertMode::Updated => {
                    format!("{} result updated (row {}).", modification.label(), index + 1)
                }
            };
            self.set_status(status);
        }
        for modification in failed {
            self.set_status(format!(
                "{} failed: filter worker disconnected.",
                modification.label()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::LoadedImage;
    use egui::Color32;
    use std::time::Duration;

    fn poll_until_idle(app: &mut FilterdeckApp, ctx: &Context) {
        for _ in 0..400 {
            app.poll_filter_jobs(ctx);
            if app.filter_jobs.is_empty() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("filter jobs never drained");
    }

    #[test]
    fn request_and_poll_inserts_exactly_one_row() {
        let ctx = Context::default();
        let mut app = FilterdeckApp::default();
        let pixels = ColorImage::new(
            [2, 1],
            vec![Color32::from_rgb(1, 0, 0), Color32::from_rgb(2, 0, 0)],
        );
        app.image = Some(LoadedImage::from_color_image(&ctx, "primary_image", pixels));

        app.request_modification(Modification::Mirror);
        assert!(app.has_running_job(Modification::Mirror));
        // A second click while the kind is running is ignored.
        app.request_modification(Modification::Mirror);
        assert_eq!(app.filter_jobs.len(), 1);

        poll_until_idle(&mut app, &ctx);
        assert_eq!(app.gallery.len(), 1);
        let row = app.gallery.get(0).expect("row inserted");
        assert_eq!(row.modification, Modification::Mirror);
        assert_eq!(row.image.pixels.pixels[0].to_srgba_unmultiplied()[0], 2);
    }

    #[test]
    fn without_a_primary_image_no_job_starts() {
        let mut app = FilterdeckApp::default();
        app.request_modification(Modification::Invert);
        assert!(app.filter_jobs.is_empty());
    }

    #[test]
    fn disconnected_worker_leaves_gallery_untouched() {
        let ctx = Context::default();
        let mut app = FilterdeckApp::default();
        let (tx, rx) = mpsc::channel::<FilterEvent>();
        drop(tx);
        app.filter_jobs.push(FilterJob {
            modification: Modification::Invert,
            rx,
            progress: 0.0,
        });

        app.poll_filter_jobs(&ctx);
        assert!(app.gallery.is_empty());
        assert!(app.filter_jobs.is_empty());
    }

    #[test]
    fn repeated_kind_updates_instead_of_inserting() {
        let ctx = Context::default();
        let mut app = FilterdeckApp::default();
        let pixels = ColorImage::new([1, 1], vec![Color32::from_rgb(7, 0, 0)]);
        app.image = Some(LoadedImage::from_color_image(&ctx, "primary_image", pixels));

        app.request_modification(Modification::Invert);
        poll_until_idle(&mut app, &ctx);
        app.request_modification(Modification::Invert);
        poll_until_idle(&mut app, &ctx);

        assert_eq!(app.gallery.len(), 1);
    }
}
