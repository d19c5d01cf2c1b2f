use super::{ActiveDownload, DownloadPrompt, FilterdeckApp};
use crate::net::{DownloadEvent, start_download, validate_download_url};
use egui::Key;
use reqwest::Url;
use std::sync::mpsc::TryRecvError;

impl FilterdeckApp {
    pub(crate) fn open_download_prompt(&mut self) {
        self.download_prompt = Some(DownloadPrompt::default());
    }

    pub(crate) fn ui_download_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.download_prompt.as_mut() else {
            return;
        };
        let mut start = false;
        let mut cancel = false;
        let mut open = true;
        egui::Window::new("Download image")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label("Fetch a photo over http(s):");
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut prompt.url_text)
                        .hint_text("https://example.com/photo.jpg")
                        .desired_width(340.0),
                );
                if edit.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    start = true;
                }
                if let Some(err) = &prompt.error {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Download").clicked() {
                        start = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if !open {
            cancel = true;
        }

        if start {
            self.start_download_from_prompt();
        } else if cancel {
            self.download_prompt = None;
            self.set_status("Download canceled.");
        }
    }

    fn start_download_from_prompt(&mut self) {
        let Some(prompt) = self.download_prompt.as_mut() else {
            return;
        };
        match validate_download_url(&prompt.url_text) {
            Ok(url) => {
                self.download_prompt = None;
                self.begin_download(url);
            }
            Err(msg) => {
                // Invalid link: keep the prompt up, never start a request.
                prompt.error = Some(msg.clone());
                self.set_status(msg);
            }
        }
    }

    fn begin_download(&mut self, url: Url) {
        self.cancel_active_download();
        // The slot empties while the download runs, exactly like picking a
        // fresh image: filter buttons stay off until pixels arrive.
        self.image = None;
        self.image_meta = None;
        self.pending_image_task = None;
        let handle = start_download(&self.config.effective_download_limits(), url.clone());
        let url_text = url.to_string();
        self.set_status(format!("Downloading {url_text}…"));
        self.active_download = Some(ActiveDownload {
            handle,
            url: url_text,
            fraction: None,
            bytes: 0,
        });
    }

    pub(crate) fn cancel_active_download(&mut self) {
        if let Some(download) = self.active_download.take() {
            download.handle.cancel();
        }
    }

    pub(crate) fn poll_download_events(&mut self) {
        let Some(mut download) = self.active_download.take() else {
            return;
        };
        loop {
            match download.handle.try_recv() {
                Ok(DownloadEvent::Progress { fraction, bytes }) => {
                    download.bytes = bytes;
                    if let Some(f) = fraction {
                        // Progress never walks backwards on screen.
                        download.fraction = Some(download.fraction.unwrap_or(0.0).max(f));
                    }
                }
                Ok(DownloadEvent::Finished(bytes)) => {
                    self.start_loading_downloaded_bytes(download.url, bytes);
                    return;
                }
                Ok(DownloadEvent::Failed(msg)) => {
                    self.set_status(format!("Download failed: {msg}"));
                    return;
                }
                Err(TryRecvError::Empty) => {
                    self.active_download = Some(download);
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    self.set_status("Download failed: worker disconnected.");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::LoadedImage;
    use egui::{Color32, ColorImage, Context};

    #[test]
    fn invalid_url_never_starts_a_download() {
        let mut app = FilterdeckApp::default();
        app.download_prompt = Some(DownloadPrompt {
            url_text: "not a url".to_string(),
            error: None,
        });
        app.start_download_from_prompt();
        assert!(app.active_download.is_none());
        // The prompt stays up with the validation error attached.
        let prompt = app.download_prompt.as_ref().expect("prompt kept open");
        assert!(prompt.error.is_some());
    }

    #[test]
    fn new_primary_image_cancels_the_active_download() {
        let ctx = Context::default();
        let mut app = FilterdeckApp::default();
        let limits = app.config.effective_download_limits();
        let url = Url::parse("http://127.0.0.1:9/never.png").expect("url");
        app.active_download = Some(ActiveDownload {
            handle: start_download(&limits, url),
            url: "http://127.0.0.1:9/never.png".to_string(),
            fraction: None,
            bytes: 0,
        });

        let pixels = ColorImage::new([1, 1], vec![Color32::WHITE]);
        let loaded = LoadedImage::from_color_image(&ctx, "primary_image", pixels);
        app.set_primary_image(loaded, None);
        assert!(app.active_download.is_none());
        assert!(app.image.is_some());
    }
}
