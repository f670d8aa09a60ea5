use crate::error::Error;
use crate::Result;

pub const BLACK: u32 = 0x00_00_00;
pub const WHITE: u32 = 0xFF_FF_FF;

/// Ordered table of `0x00RRGGBB` color values addressed by pixel index.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    num_colors: u32,
    colors: Vec<u32>,
}

impl Palette {
    pub fn new(num_colors: u32) -> Result<Self> {
        if num_colors == 0 {
            return Err(Error::InvalidDimension("num_colors"));
        }
        Ok(Self {
            num_colors,
            colors: vec![BLACK; num_colors as usize],
        })
    }

    pub fn from_colors(colors: Vec<u32>) -> Result<Self> {
        let num_colors =
            u32::try_from(colors.len()).map_err(|_| Error::InvalidDimension("num_colors"))?;
        if num_colors == 0 {
            return Err(Error::InvalidDimension("num_colors"));
        }
        Ok(Self { num_colors, colors })
    }

    /// Evenly spaced gray levels from black to white.
    pub fn gray_ramp(levels: u32) -> Result<Self> {
        let mut palette = Self::new(levels)?;
        let max_level = levels.saturating_sub(1).max(1);
        for index in 0..levels {
            let gray = scale_to_u8(index, max_level);
            palette.set(index, rgb(gray, gray, gray))?;
        }
        Ok(palette)
    }

    pub fn num_colors(&self) -> u32 {
        self.num_colors
    }

    pub fn set(&mut self, index: u32, color: u32) -> Result<()> {
        let slot = self.slot(index)?;
        self.colors[slot] = color;
        Ok(())
    }

    pub fn get(&self, index: u32) -> Result<u32> {
        let slot = self.slot(index)?;
        Ok(self.colors[slot])
    }

    pub fn validate(&self) -> Result<()> {
        if self.colors.len() != self.num_colors as usize {
            return Err(Error::SizeMismatch {
                expected: self.num_colors as usize,
                actual: self.colors.len(),
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.colors.iter().copied()
    }

    fn slot(&self, index: u32) -> Result<usize> {
        if index >= self.num_colors {
            return Err(Error::OutOfRange {
                index: index as usize,
                length: self.num_colors as usize,
            });
        }
        Ok(index as usize)
    }
}

pub fn rgb(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | blue as u32
}

/// Rescales a sample in `0..=max_value` to `0..=255`, rounding to nearest.
pub fn scale_to_u8(sample: u32, max_value: u32) -> u8 {
    let scaled = (sample as u64 * 255 + max_value as u64 / 2) / max_value as u64;
    scaled.min(255) as u8
}
