mod load;
mod meta;
mod modify;
mod save;
mod texture;

pub use load::{decode_image_from_bytes, decode_image_from_path};
pub(crate) use load::ensure_pixel_budget;
pub use meta::{
    ImageMeta, ImageOrigin, describe_aspect_ratio, format_system_time, human_readable_bytes,
    total_pixel_count,
};
pub use modify::{Modification, apply_modification};
pub use save::save_color_image;
pub use texture::LoadedImage;
