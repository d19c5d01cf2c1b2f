mod app;
mod config;
mod gallery;
mod image;
mod net;

use app::FilterdeckApp;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    let initial_image_path: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Filterdeck — Photo Filters",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(FilterdeckApp::new_with_initial_path(
                &cc.egui_ctx,
                initial_image_path.as_deref(),
            )))
        }),
    )
}
