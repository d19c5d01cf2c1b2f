use std::fs;
use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use egui::Color32;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "filterdeck.toml";

fn alpha_to_u8(alpha: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Accent color used for progress bars and attention hints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccentStyle {
    pub color: [u8; 3],
    pub alpha: f32,
}

impl Default for AccentStyle {
    fn default() -> Self {
        Self {
            color: [80, 160, 230],
            alpha: 1.0,
        }
    }
}

impl AccentStyle {
    pub fn color32(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(
            self.color[0],
            self.color[1],
            self.color[2],
            alpha_to_u8(self.alpha),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub accent: AccentStyle,
    pub image_limits: ImageLimits,
    pub download: DownloadLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            accent: AccentStyle::default(),
            image_limits: ImageLimits::default(),
            download: DownloadLimits::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match toml::from_str::<Self>(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {}: {err}", path.display());
                    }
                }
            }
        }
        Self::default()
    }

    pub fn effective_image_limits(&self) -> ImageLimits {
        self.image_limits.sanitized()
    }

    pub fn effective_download_limits(&self) -> DownloadLimits {
        self.download.sanitized()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Filterdeck", "Filterdeck") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(
                base_dirs
                    .config_dir()
                    .join("filterdeck")
                    .join(CONFIG_FILE_NAME),
            );
        }

        paths
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub image_dim: u32,
    pub total_pixels: u64,
    pub alloc_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            image_dim: 12_000,
            total_pixels: 80_000_000,       // ~80 MP
            alloc_bytes: 512 * 1024 * 1024, // 512 MiB
        }
    }
}

impl ImageLimits {
    pub fn sanitized(&self) -> Self {
        // Clamp to reasonable operating bounds to avoid pathological configs.
        let dim = self.image_dim.clamp(64, 100_000);
        let pixels = self.total_pixels.clamp(1_000_000, 5_000_000_000); // 1 MP .. 5 GP
        let alloc = self
            .alloc_bytes
            .clamp(8 * 1024 * 1024, 8 * 1024 * 1024 * 1024); // 8 MiB .. 8 GiB
        Self {
            image_dim: dim,
            total_pixels: pixels,
            alloc_bytes: alloc,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadLimits {
    pub max_body_bytes: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for DownloadLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024 * 1024, // 64 MiB
            connect_timeout_secs: 15,
            max_redirects: 10,
        }
    }
}

impl DownloadLimits {
    pub fn sanitized(&self) -> Self {
        let body = self
            .max_body_bytes
            .clamp(1024 * 1024, 2 * 1024 * 1024 * 1024); // 1 MiB .. 2 GiB
        let timeout = self.connect_timeout_secs.clamp(1, 300);
        let redirects = self.max_redirects.min(32);
        Self {
            max_body_bytes: body,
            connect_timeout_secs: timeout,
            max_redirects: redirects,
        }
    }
}
