use std::io::Read;

use super::header::{HeaderParser, NetpbmHeader, Tokenizer};
use super::samples::decode_samples;
use super::NetpbmFormat;
use crate::binary_stream::LookaheadReader;
use crate::image::{Bitmap, DecodeOptions, DecodedImage, ImageReader};
use crate::Result;

pub struct NetpbmImageReader<T: Read> {
    reader: LookaheadReader<T>,
    options: DecodeOptions,
}

impl<T: Read> NetpbmImageReader<T> {
    pub fn new(reader: T, options: DecodeOptions) -> Self {
        Self {
            reader: LookaheadReader::new(reader),
            options,
        }
    }

    fn read_header(&mut self, format: NetpbmFormat) -> Result<NetpbmHeader> {
        let mut tokenizer = Tokenizer::new(&mut self.reader);
        let header = HeaderParser::new(&mut tokenizer).parse_tokens(format)?;
        log::debug!(
            "Parsed {} header: {}x{}, max value {}",
            header.format.magic(),
            header.width,
            header.height,
            header.max_value
        );
        Ok(header)
    }

    fn allocate_bitmap(header: &NetpbmHeader) -> Result<Bitmap> {
        Bitmap::new(header.width, header.height, Self::bitmap_colors(header))
    }

    // color images store palette indices, bounded by both the pixel count
    // and the number of representable colors
    fn bitmap_colors(header: &NetpbmHeader) -> u32 {
        if !header.format.is_color() {
            return header.sample_levels();
        }
        let representable = (header.sample_levels() as u64).pow(3);
        let pixel_count = header.width as u64 * header.height as u64;
        representable.min(pixel_count).min(u32::MAX as u64) as u32
    }
}

impl<T: Read> ImageReader for NetpbmImageReader<T> {
    fn read_image(&mut self) -> Result<DecodedImage> {
        let format = NetpbmFormat::sniff(&mut self.reader)?;
        let header = self.read_header(format)?;
        let mut bitmap = Self::allocate_bitmap(&header)?;
        let palette = decode_samples(&mut self.reader, &header, &mut bitmap)?;
        bitmap.validate()?;
        palette.validate()?;
        let palette = self.options.palette.then_some(palette);
        log::info!(
            "Decoded {} image {}x{} with {} colors",
            format,
            bitmap.width(),
            bitmap.height(),
            bitmap.colors()
        );
        Ok(DecodedImage {
            format,
            bitmap,
            palette,
        })
    }
}
