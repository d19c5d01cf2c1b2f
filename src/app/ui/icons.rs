//! Unicode UI icon constants.
//!
//! Uses a BMP-only "safe" subset for broad font coverage (no emoji fonts needed).

use crate::image::Modification;

pub const ICON_MENU: &str = "☰";
pub const ICON_INFO: &str = "ℹ";
pub const ICON_DOWNLOAD: &str = "⇩";
pub const ICON_SAVE: &str = "⤓";
pub const ICON_PROMOTE: &str = "↥";
pub const ICON_DELETE: &str = "✖";

pub const fn modification_icon(modification: Modification) -> &'static str {
    match modification {
        Modification::Rotate => "↻",
        Modification::Grayscale => "◑",
        Modification::Mirror => "⇆",
        Modification::Invert => "◩",
        Modification::LeftSideMirror => "◧",
    }
}
