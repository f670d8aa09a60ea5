use std::fmt::Display;

use crate::error::Error;
use crate::Result;

const WORD_BITS: usize = u32::BITS as usize;

/// A fixed size grid of pixel values packed into 32 bit words.
///
/// Every pixel occupies `bits_per_pixel` bits, the smallest width able to hold
/// `colors` distinct values. Pixel `i` starts at bit `i * bits_per_pixel`,
/// counted from the least significant bit of the first word, and may continue
/// into the next word.
pub struct Bitmap {
    width: u32,
    height: u32,
    colors: u32,
    bits_per_pixel: u32,
    words: Vec<u32>,
    /// one bit per pixel, set once the pixel has been written
    written: Vec<u32>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, colors: u32) -> Result<Self> {
        Self::check_dimension(width, "width")?;
        Self::check_dimension(height, "height")?;
        Self::check_dimension(colors, "colors")?;
        let bits_per_pixel = Self::bits_for_colors(colors);
        let pixel_count = Self::checked_pixel_count(width, height)?;
        let word_count = Self::packed_word_count(pixel_count, bits_per_pixel)?;
        let written_count = pixel_count.div_ceil(WORD_BITS);
        log::debug!(
            "Allocating bitmap {}x{} with {} colors at {} bits per pixel ({} words)",
            width,
            height,
            colors,
            bits_per_pixel,
            word_count
        );
        Ok(Self {
            width,
            height,
            colors,
            bits_per_pixel,
            words: Self::zeroed_words(word_count)?,
            written: Self::zeroed_words(written_count)?,
        })
    }

    fn zeroed_words(count: usize) -> Result<Vec<u32>> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(count)
            .map_err(|_| Error::AllocationFailed { words: count })?;
        words.resize(count, 0);
        Ok(words)
    }

    fn check_dimension(value: u32, name: &'static str) -> Result<()> {
        if value == 0 {
            return Err(Error::InvalidDimension(name));
        }
        Ok(())
    }

    fn checked_pixel_count(width: u32, height: u32) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::InvalidDimension("width * height"))
    }

    fn packed_word_count(pixel_count: usize, bits_per_pixel: u32) -> Result<usize> {
        pixel_count
            .checked_mul(bits_per_pixel as usize)
            .map(|bits| bits.div_ceil(WORD_BITS))
            .ok_or(Error::InvalidDimension("width * height"))
    }

    /// Smallest bit width able to represent `colors` distinct values, at least one.
    pub fn bits_for_colors(colors: u32) -> u32 {
        (u32::BITS - colors.saturating_sub(1).leading_zeros()).max(1)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn colors(&self) -> u32 {
        self.colors
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The packed backing storage.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn abs_pos(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width {
            return Err(Error::OutOfRange {
                index: x as usize,
                length: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::OutOfRange {
                index: y as usize,
                length: self.height as usize,
            });
        }
        Ok(x as usize + y as usize * self.width as usize)
    }

    /// Inverse of [`Bitmap::abs_pos`].
    pub fn decode_index(&self, index: usize) -> Result<(u32, u32)> {
        self.check_index(index)?;
        let width = self.width as usize;
        Ok(((index % width) as u32, (index / width) as u32))
    }

    pub fn set(&mut self, x: u32, y: u32, value: u32) -> Result<()> {
        let index = self.abs_pos(x, y)?;
        self.set_index(index, value)
    }

    pub fn set_index(&mut self, index: usize, value: u32) -> Result<()> {
        self.check_index(index)?;
        if value >= self.colors {
            return Err(Error::InvalidValue {
                value,
                colors: self.colors,
            });
        }
        self.write_bits(index, value);
        self.written[index / WORD_BITS] |= 1 << (index % WORD_BITS);
        Ok(())
    }

    pub fn get(&self, x: u32, y: u32) -> Result<u32> {
        let index = self.abs_pos(x, y)?;
        self.get_index(index)
    }

    pub fn get_index(&self, index: usize) -> Result<u32> {
        self.check_index(index)?;
        if !self.is_written(index) {
            return Err(Error::Uninitialized(index));
        }
        Ok(self.read_bits(index))
    }

    /// Checks the packed storage against the declared dimensions and that
    /// every pixel has been written.
    pub fn validate(&self) -> Result<()> {
        let expected = Self::packed_word_count(self.pixel_count(), self.bits_per_pixel)?;
        if self.words.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: self.words.len(),
            });
        }
        let expected = self.pixel_count().div_ceil(WORD_BITS);
        if self.written.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: self.written.len(),
            });
        }
        match (0..self.pixel_count()).find(|&index| !self.is_written(index)) {
            Some(index) => Err(Error::Uninitialized(index)),
            None => Ok(()),
        }
    }

    pub fn is_populated(&self) -> bool {
        (0..self.pixel_count()).all(|index| self.is_written(index))
    }

    /// Row-major pixel values, `None` for pixels never written.
    pub fn values(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        (0..self.pixel_count()).map(|index| self.is_written(index).then(|| self.read_bits(index)))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let length = self.pixel_count();
        if index >= length {
            return Err(Error::OutOfRange { index, length });
        }
        Ok(())
    }

    fn is_written(&self, index: usize) -> bool {
        self.written[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    fn value_mask(&self) -> u64 {
        (1_u64 << self.bits_per_pixel) - 1
    }

    // two adjacent words viewed as one 64 bit window, so pixels crossing a
    // word boundary need no special casing
    fn window(&self, word_index: usize) -> u64 {
        let low = self.words[word_index] as u64;
        let high = self.words.get(word_index + 1).copied().unwrap_or(0) as u64;
        low | (high << WORD_BITS)
    }

    fn write_bits(&mut self, index: usize, value: u32) {
        let bit_offset = index * self.bits_per_pixel as usize;
        let word_index = bit_offset / WORD_BITS;
        let shift = bit_offset % WORD_BITS;
        let mask = self.value_mask() << shift;
        let window = (self.window(word_index) & !mask) | ((value as u64) << shift);
        self.words[word_index] = window as u32;
        if shift + self.bits_per_pixel as usize > WORD_BITS {
            self.words[word_index + 1] = (window >> WORD_BITS) as u32;
        }
    }

    fn read_bits(&self, index: usize) -> u32 {
        let bit_offset = index * self.bits_per_pixel as usize;
        let word_index = bit_offset / WORD_BITS;
        let shift = bit_offset % WORD_BITS;
        ((self.window(word_index) >> shift) & self.value_mask()) as u32
    }
}

impl Display for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for (index, value) in self.values().enumerate() {
            match value {
                Some(value) => write!(f, "{:>4}", value)?,
                None => write!(f, "{:>4}", "-")?,
            }
            if (index + 1) % self.width as usize == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
