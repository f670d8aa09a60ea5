use std::collections::HashMap;
use std::io::{ErrorKind, Read};

use super::header::{NetpbmHeader, Tokenizer};
use crate::binary_stream::BitReader;
use crate::error::Error;
use crate::image::palette::{rgb, scale_to_u8, BLACK, WHITE};
use crate::image::{Bitmap, Palette};
use crate::Result;

trait SampleSource {
    fn next_sample(&mut self, sample_index: usize) -> Result<u32>;
}

struct AsciiSamples<'a, R: Read> {
    tokenizer: Tokenizer<'a, R>,
}

impl<R: Read> SampleSource for AsciiSamples<'_, R> {
    fn next_sample(&mut self, sample_index: usize) -> Result<u32> {
        let token = self
            .tokenizer
            .next_token()?
            .ok_or(Error::MalformedPixelData(sample_index))?;
        if !token.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::MalformedPixelData(sample_index));
        }
        token
            .parse()
            .map_err(|_| Error::MalformedPixelData(sample_index))
    }
}

struct BinarySamples<'a, R: Read> {
    reader: &'a mut R,
    bytes_per_sample: usize,
    expected_bytes: usize,
    bytes_read: usize,
}

impl<R: Read> SampleSource for BinarySamples<'_, R> {
    fn next_sample(&mut self, _sample_index: usize) -> Result<u32> {
        let mut sample = 0;
        for _ in 0..self.bytes_per_sample {
            let mut byte = [0; 1];
            self.reader
                .read_exact(&mut byte)
                .map_err(|e| truncated_or_io(e, self.expected_bytes, self.bytes_read))?;
            self.bytes_read += 1;
            // multi byte samples are big endian
            sample = (sample << 8) | byte[0] as u32;
        }
        Ok(sample)
    }
}

fn truncated_or_io(error: std::io::Error, expected: usize, actual: usize) -> Error {
    if error.kind() == ErrorKind::UnexpectedEof {
        Error::TruncatedData { expected, actual }
    } else {
        Error::Io(error)
    }
}

/// Writes every pixel of the stream into `bitmap`.
///
/// Returns the palette the stored values resolve to.
pub(super) fn decode_samples<R: Read>(
    reader: &mut R,
    header: &NetpbmHeader,
    bitmap: &mut Bitmap,
) -> Result<Palette> {
    if header.format.is_binary() {
        if header.format.is_bitonal() {
            decode_packed_bits(reader, header, bitmap)?;
            return Palette::from_colors(vec![BLACK, WHITE]);
        }
        let mut source = BinarySamples {
            reader,
            bytes_per_sample: header.bytes_per_sample(),
            expected_bytes: header.pixel_count()
                * header.format.channels()
                * header.bytes_per_sample(),
            bytes_read: 0,
        };
        decode_from_source(&mut source, header, bitmap)
    } else {
        let mut source = AsciiSamples {
            tokenizer: Tokenizer::new(reader),
        };
        decode_from_source(&mut source, header, bitmap)
    }
}

fn decode_from_source<S: SampleSource>(
    source: &mut S,
    header: &NetpbmHeader,
    bitmap: &mut Bitmap,
) -> Result<Palette> {
    if header.format.is_color() {
        let colors = decode_color_indices(source, header, bitmap)?;
        Palette::from_colors(colors)
    } else {
        decode_levels(source, header, bitmap)?;
        levels_palette(header)
    }
}

/// One sample per pixel, stored as the pixel value.
fn decode_levels<S: SampleSource>(
    source: &mut S,
    header: &NetpbmHeader,
    bitmap: &mut Bitmap,
) -> Result<()> {
    for index in 0..header.pixel_count() {
        let sample = source.next_sample(index)?;
        bitmap.set_index(index, sample)?;
    }
    Ok(())
}

// bitonal ascii data uses 1 for ink, every other format counts up from black
fn levels_palette(header: &NetpbmHeader) -> Result<Palette> {
    if header.format.is_bitonal() {
        return Palette::from_colors(vec![WHITE, BLACK]);
    }
    Palette::gray_ramp(header.sample_levels())
}

/// One continuous bit stream of `width * height` pixels, most significant bit
/// first, padded only at the very end. A set bit is stored as pixel 0 and a
/// clear bit as pixel 1.
fn decode_packed_bits<R: Read>(
    reader: &mut R,
    header: &NetpbmHeader,
    bitmap: &mut Bitmap,
) -> Result<()> {
    let expected = header.pixel_count().div_ceil(8);
    let mut bit_reader = BitReader::new(reader);
    for index in 0..header.pixel_count() {
        let bit = bit_reader
            .read_bit()
            .map_err(|e| truncated_or_io(e, expected, bit_reader.bytes_read()))?;
        bitmap.set_index(index, if bit { 0 } else { 1 })?;
    }
    Ok(())
}

/// Three samples per pixel. Each distinct color gets the next free index in
/// order of first appearance.
fn decode_color_indices<S: SampleSource>(
    source: &mut S,
    header: &NetpbmHeader,
    bitmap: &mut Bitmap,
) -> Result<Vec<u32>> {
    let mut indices: HashMap<[u32; 3], u32> = HashMap::new();
    let mut colors = Vec::new();
    for index in 0..header.pixel_count() {
        let mut color = [0; 3];
        for (channel, sample) in color.iter_mut().enumerate() {
            *sample = next_channel_sample(source, header, index * 3 + channel)?;
        }
        let next_index = colors.len() as u32;
        let color_index = *indices.entry(color).or_insert_with(|| {
            let [red, green, blue] = color.map(|sample| scale_to_u8(sample, header.max_value));
            colors.push(rgb(red, green, blue));
            next_index
        });
        bitmap.set_index(index, color_index)?;
    }
    log::debug!("Found {} distinct colors", colors.len());
    Ok(colors)
}

fn next_channel_sample<S: SampleSource>(
    source: &mut S,
    header: &NetpbmHeader,
    sample_index: usize,
) -> Result<u32> {
    let sample = source.next_sample(sample_index)?;
    if sample > header.max_value {
        return Err(Error::InvalidValue {
            value: sample,
            colors: header.sample_levels(),
        });
    }
    Ok(sample)
}
