use egui::{ColorImage, Context, TextureHandle, TextureOptions};

/// Image data plus the egui texture handle that mirrors its pixels.
pub struct LoadedImage {
    pub size: [usize; 2],
    pub texture: TextureHandle,
    pub pixels: ColorImage,
}

impl LoadedImage {
    /// Construct a `LoadedImage` from in-memory pixels and upload a texture.
    pub fn from_color_image(ctx: &Context, name: &str, pixels: ColorImage) -> Self {
        let size = pixels.size;
        let texture = ctx.load_texture(name, pixels.clone(), TextureOptions::LINEAR);
        Self {
            size,
            texture,
            pixels,
        }
    }

    /// Replace pixel data and refresh the texture.
    pub fn replace_pixels(&mut self, pixels: ColorImage) {
        self.pixels = pixels;
        self.size = self.pixels.size;
        self.texture
            .set(self.pixels.clone(), TextureOptions::LINEAR);
    }
}
