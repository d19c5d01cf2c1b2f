//! Main egui/eframe application state and UI orchestration.

use crate::config::AppConfig;
use crate::gallery::Gallery;
use crate::image::{ImageMeta, LoadedImage, Modification, save_color_image};
use egui::{ColorImage, Context, Key};
use egui_file_dialog::{DialogState, FileDialog};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::{Duration, SystemTime};

mod clipboard;
mod download;
mod filter_jobs;
mod image_loader;
mod ui;

enum ImageLoadRequest {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

struct PendingImageTask {
    rx: Receiver<ImageLoadResult>,
    meta: PendingImageMeta,
}

enum ImageLoadResult {
    Success(ColorImage),
    Error(String),
}

#[derive(Clone)]
enum PendingImageMeta {
    Path {
        path: PathBuf,
    },
    DroppedBytes {
        name: Option<String>,
        byte_len: usize,
        last_modified: Option<SystemTime>,
    },
    Download {
        url: String,
        byte_len: usize,
    },
}

impl PendingImageMeta {
    fn description(&self) -> String {
        match self {
            Self::Path { path } => path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), str::to_string),
            Self::DroppedBytes { name, .. } => name
                .as_deref()
                .map_or_else(|| "dropped bytes".to_string(), str::to_string),
            Self::Download { url, .. } => url.clone(),
        }
    }

    fn into_image_meta(self) -> ImageMeta {
        match self {
            Self::Path { path } => ImageMeta::from_path(&path),
            Self::DroppedBytes {
                name,
                byte_len,
                last_modified,
            } => ImageMeta::from_dropped_bytes(name.as_deref(), byte_len, last_modified),
            Self::Download { url, byte_len } => {
                ImageMeta::from_download(url, byte_len as u64)
            }
        }
    }
}

/// Worker events for one running filter. A worker that dies without a `Done`
/// is observed as a channel disconnect and reported as a failure.
enum FilterEvent {
    Progress(f32),
    Done(ColorImage),
}

struct FilterJob {
    modification: Modification,
    rx: Receiver<FilterEvent>,
    progress: f32,
}

struct ActiveDownload {
    handle: crate::net::DownloadHandle,
    url: String,
    fraction: Option<f32>,
    bytes: u64,
}

#[derive(Default)]
struct DownloadPrompt {
    url_text: String,
    error: Option<String>,
}

struct SavePayload {
    pixels: ColorImage,
    label: &'static str,
    suggested_name: String,
}

enum NativeDialog {
    Open(FileDialog),
    SaveResult {
        dialog: FileDialog,
        payload: SavePayload,
    },
}

/// Top-level application state for the Filterdeck UI.
pub struct FilterdeckApp {
    image: Option<LoadedImage>,
    image_meta: Option<ImageMeta>,
    gallery: Gallery,
    pending_image_task: Option<PendingImageTask>,
    filter_jobs: Vec<FilterJob>,
    active_download: Option<ActiveDownload>,
    download_prompt: Option<DownloadPrompt>,
    active_dialog: Option<NativeDialog>,
    last_image_dir: Option<PathBuf>,
    last_save_dir: Option<PathBuf>,
    last_status: Option<String>,
    info_window_open: bool,
    config: AppConfig,
}

impl Default for FilterdeckApp {
    fn default() -> Self {
        Self {
            image: None,
            image_meta: None,
            gallery: Gallery::default(),
            pending_image_task: None,
            filter_jobs: Vec::new(),
            active_download: None,
            download_prompt: None,
            active_dialog: None,
            last_image_dir: None,
            last_save_dir: None,
            last_status: None,
            info_window_open: false,
            config: AppConfig::load(),
        }
    }
}

impl FilterdeckApp {
    /// Create a new app and optionally queue an initial image load.
    pub fn new_with_initial_path(_ctx: &Context, initial_path: Option<&Path>) -> Self {
        let mut app = Self::default();
        if let Some(p) = initial_path {
            app.remember_image_dir_from_path(p);
            app.start_loading_image_from_path(p.to_owned());
        }
        app
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.last_status = Some(msg.into());
    }

    /// Install a new primary image. Any in-flight download is cancelled and
    /// its progress UI disappears; every filter button becomes usable again.
    /// Collected results stay in the list.
    fn set_primary_image(&mut self, image: LoadedImage, meta: Option<ImageMeta>) {
        self.cancel_active_download();
        self.image = Some(image);
        self.image_meta = meta;
    }

    fn promote_row_to_primary(&mut self, ctx: &Context, index: usize) {
        let Some(entry) = self.gallery.get(index) else {
            return;
        };
        let label = entry.modification.label();
        let pixels = entry.image.pixels.clone();
        let promoted = LoadedImage::from_color_image(ctx, "primary_image", pixels);
        self.set_primary_image(promoted, None);
        self.set_status(format!("{label} result is now the primary image."));
    }

    fn delete_row(&mut self, index: usize) {
        if let Some(removed) = self.gallery.remove(index) {
            self.set_status(format!(
                "{} removed from results.",
                removed.modification.label()
            ));
        }
    }
}

impl eframe::App for FilterdeckApp {
    #[allow(clippy::too_many_lines)]
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);
        self.poll_download_events();
        self.poll_filter_jobs(ctx);

        // Global hotkeys (ignored while typing in text fields)
        let wants_kb = ctx.wants_keyboard_input();
        if !wants_kb {
            if self.active_dialog.is_none()
                && ctx.input(|i| i.key_pressed(Key::O) && i.modifiers.command)
            {
                self.open_image_dialog();
            }
            if self.active_dialog.is_none()
                && ctx.input(|i| i.key_pressed(Key::V) && i.modifiers.command)
            {
                self.paste_image_from_clipboard(ctx);
            }
            if self.active_dialog.is_none()
                && ctx.input(|i| i.key_pressed(Key::L) && i.modifiers.command)
            {
                self.open_download_prompt();
            }
            if self.image.is_some() && ctx.input(|i| i.key_pressed(Key::I) && i.modifiers.command) {
                self.info_window_open = true;
            }
        }

        // Esc: dismiss the download prompt
        if self.download_prompt.is_some() && ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.download_prompt = None;
            self.set_status("Download canceled.");
        }

        // Background work has no UI events of its own; keep frames coming
        // while any of it is pending.
        if self.pending_image_task.is_some()
            || self.active_download.is_some()
            || !self.filter_jobs.is_empty()
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top(ui));
        egui::SidePanel::right("results")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.ui_results(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.ui_central(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        self.ui_download_prompt(ctx);
        self.ui_image_info_window(ctx);

        let mut close_dialog = false;
        let mut picked_save_path: Option<PathBuf> = None;

        if let Some(dialog_state) = self.active_dialog.as_mut() {
            match dialog_state {
                NativeDialog::Open(dialog) => {
                    dialog.update(ctx);
                    if let Some(path) = dialog.take_picked() {
                        self.start_loading_image_from_path(path);
                        close_dialog = true;
                    } else {
                        match dialog.state() {
                            DialogState::Cancelled => {
                                self.set_status("Open canceled.");
                                close_dialog = true;
                            }
                            DialogState::Closed => close_dialog = true,
                            _ => {}
                        }
                    }
                }
                NativeDialog::SaveResult { dialog, payload } => {
                    dialog.update(ctx);
                    if let Some(path) = dialog.take_picked() {
                        picked_save_path = Some(path.clone());
                        let label = payload.label;
                        match save_color_image(&path, &payload.pixels) {
                            Ok(()) => self.set_status(format!(
                                "Saved {label} result to {}.",
                                path.display()
                            )),
                            Err(err) => self.set_status(format!("Save failed: {err}")),
                        }
                        close_dialog = true;
                    } else {
                        match dialog.state() {
                            DialogState::Cancelled => {
                                self.set_status("Save canceled.");
                                close_dialog = true;
                            }
                            DialogState::Closed => close_dialog = true,
                            _ => {}
                        }
                    }
                }
            }
        }

        if let Some(path) = picked_save_path {
            self.remember_save_dir_from_path(&path);
        }

        if close_dialog {
            self.active_dialog = None;
        }
    }

    // All per-frame work is driven from `update` above, which eframe still
    // invokes each frame. This required trait method intentionally does
    // nothing.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}
}
