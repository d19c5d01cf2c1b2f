use super::super::FilterdeckApp;
use super::icons;
use crate::image::Modification;

impl FilterdeckApp {
    pub(crate) fn ui_top(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Use egui's built-in theme toggle so icon matches current mode.
            egui::widgets::global_theme_preference_switch(ui);
            ui.separator();

            self.ui_file_menu(ui);
            ui.separator();

            let has_image = self.image.is_some();
            self.ui_filter_buttons(ui, has_image);
            ui.separator();

            let info_resp = ui
                .add_enabled(
                    has_image,
                    egui::Button::new(format!("{} Image info", icons::ICON_INFO))
                        .shortcut_text("Ctrl+I"),
                )
                .on_hover_text("Show file & image details (Ctrl+I)");
            if info_resp.clicked() && has_image {
                self.info_window_open = true;
            }
        });
    }

    fn ui_file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button(format!("{} File", icons::ICON_MENU), |ui| {
            if ui
                .add(egui::Button::new("Open image…").shortcut_text("Ctrl+O"))
                .on_hover_text("Open an image (Ctrl+O). You can also drag & drop into the center.")
                .clicked()
            {
                self.open_image_dialog();
                ui.close();
            }

            if ui
                .add(egui::Button::new("Paste image").shortcut_text("Ctrl+V"))
                .on_hover_text("Paste image from clipboard (Ctrl+V)")
                .clicked()
            {
                self.paste_image_from_clipboard(ui.ctx());
                ui.close();
            }

            ui.separator();

            if ui
                .add(
                    egui::Button::new(format!(
                        "{} Download from URL…",
                        icons::ICON_DOWNLOAD
                    ))
                    .shortcut_text("Ctrl+L"),
                )
                .on_hover_text("Fetch a photo over http(s) (Ctrl+L)")
                .clicked()
            {
                self.open_download_prompt();
                ui.close();
            }
        });
    }

    fn ui_filter_buttons(&mut self, ui: &mut egui::Ui, has_image: bool) {
        for modification in Modification::ALL {
            let running = self.has_running_job(modification);
            let label = format!(
                "{} {}",
                icons::modification_icon(modification),
                modification.label()
            );
            let resp = ui
                .add_enabled(has_image && !running, egui::Button::new(label))
                .on_hover_text(modification.describe());
            if resp.clicked() {
                self.request_modification(modification);
            }
        }
    }
}
