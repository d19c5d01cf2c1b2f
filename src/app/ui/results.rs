use super::super::FilterdeckApp;
use super::icons;
use egui::RichText;

const THUMBNAIL_SIDE: f32 = 64.0;

enum RowAction {
    Save(usize),
    Promote(usize),
    Delete(usize),
}

#[allow(clippy::cast_precision_loss)]
fn thumbnail_size(size: [usize; 2]) -> egui::Vec2 {
    let w = (size[0] as f32).max(1.0);
    let h = (size[1] as f32).max(1.0);
    let scale = (THUMBNAIL_SIDE / w).min(THUMBNAIL_SIDE / h).min(1.0);
    egui::vec2(w * scale, h * scale)
}

impl FilterdeckApp {
    pub(crate) fn ui_results(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Results");
            ui.label(RichText::new(format!("({})", self.gallery.len())).weak());
        });
        ui.separator();

        if self.gallery.is_empty() && self.filter_jobs.is_empty() {
            ui.label(RichText::new("Apply a filter to collect results here.").weak());
            return;
        }

        let accent = self.config.accent.color32();
        let mut action: Option<RowAction> = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, entry) in self.gallery.iter().enumerate() {
                ui.horizontal(|ui| {
                    let thumb = egui::Image::new((
                        entry.image.texture.id(),
                        thumbnail_size(entry.image.size),
                    ));
                    ui.add(thumb);
                    ui.vertical(|ui| {
                        ui.label(format!(
                            "{} {}",
                            icons::modification_icon(entry.modification),
                            entry.modification.label()
                        ));
                        let [w, h] = entry.image.size;
                        ui.label(RichText::new(format!("{w} × {h} px")).small().weak());
                        if let Some(progress) = self.job_progress(entry.modification) {
                            // This kind is re-running; the row refreshes when
                            // it completes.
                            ui.add(
                                egui::ProgressBar::new(progress)
                                    .desired_width(140.0)
                                    .fill(accent)
                                    .show_percentage(),
                            );
                        } else {
                            ui.horizontal(|ui| {
                                if ui
                                    .small_button(format!("{} Save…", icons::ICON_SAVE))
                                    .on_hover_text("Save this result to disk")
                                    .clicked()
                                {
                                    action = Some(RowAction::Save(index));
                                }
                                if ui
                                    .small_button(format!("{} Use", icons::ICON_PROMOTE))
                                    .on_hover_text("Use this result as the primary image")
                                    .clicked()
                                {
                                    action = Some(RowAction::Promote(index));
                                }
                                if ui
                                    .small_button(format!("{} Delete", icons::ICON_DELETE))
                                    .on_hover_text("Remove this row")
                                    .clicked()
                                {
                                    action = Some(RowAction::Delete(index));
                                }
                            });
                        }
                    });
                });
                ui.separator();
            }

            // First-time applications have no row yet; show a pending stub
            // until the result arrives.
            for job in &self.filter_jobs {
                if self.gallery.index_of(job.modification).is_some() {
                    continue;
                }
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} {}…",
                        icons::modification_icon(job.modification),
                        job.modification.label()
                    ));
                    ui.add(
                        egui::ProgressBar::new(job.progress)
                            .desired_width(120.0)
                            .fill(accent)
                            .show_percentage(),
                    );
                });
                ui.separator();
            }
        });

        match action {
            Some(RowAction::Save(index)) => self.save_result_dialog(index),
            Some(RowAction::Promote(index)) => {
                let ctx = ui.ctx().clone();
                self.promote_row_to_primary(&ctx, index);
            }
            Some(RowAction::Delete(index)) => self.delete_row(index),
            None => {}
        }
    }
}
