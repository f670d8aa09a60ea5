use crate::Arguments;

pub mod bitmap;
pub mod palette;
pub mod reader;

pub use bitmap::Bitmap;
pub use palette::Palette;
pub use reader::NetpbmFormat;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<DecodedImage>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecodeOptions {
    /// also produce the palette the pixel indices resolve to
    pub palette: bool,
}

impl From<&Arguments> for DecodeOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            palette: value.palette,
        }
    }
}

/// A fully populated bitmap together with the palette, if one was requested.
pub struct DecodedImage {
    pub format: NetpbmFormat,
    pub bitmap: Bitmap,
    pub palette: Option<Palette>,
}

impl DecodedImage {
    pub fn into_parts(self) -> (Bitmap, Option<Palette>) {
        (self.bitmap, self.palette)
    }
}
