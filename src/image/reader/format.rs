use std::fmt::Display;
use std::io::Read;

use crate::binary_stream::LookaheadReader;
use crate::error::Error;
use crate::Result;

const MAGIC_LENGTH: usize = 2;

/// The six members of the NetPBM family, keyed by their magic token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetpbmFormat {
    /// `P1`
    AsciiMono,
    /// `P2`
    AsciiGray,
    /// `P3`
    AsciiColor,
    /// `P4`
    BinaryMono,
    /// `P5`
    BinaryGray,
    /// `P6`
    BinaryColor,
}

impl NetpbmFormat {
    /// Looks at the magic token without consuming it.
    pub fn sniff<R: Read>(reader: &mut LookaheadReader<R>) -> Result<Self> {
        let magic = reader.peek(MAGIC_LENGTH)?;
        let format = Self::from_magic(magic)?;
        log::debug!("Detected {} input", format);
        Ok(format)
    }

    pub fn from_magic(magic: &[u8]) -> Result<Self> {
        match magic {
            b"P1" => Ok(Self::AsciiMono),
            b"P2" => Ok(Self::AsciiGray),
            b"P3" => Ok(Self::AsciiColor),
            b"P4" => Ok(Self::BinaryMono),
            b"P5" => Ok(Self::BinaryGray),
            b"P6" => Ok(Self::BinaryColor),
            [first, second] => Err(Error::UnsupportedFormat(Some([*first, *second]))),
            _ => Err(Error::UnsupportedFormat(None)),
        }
    }

    pub fn magic(&self) -> &'static str {
        match self {
            Self::AsciiMono => "P1",
            Self::AsciiGray => "P2",
            Self::AsciiColor => "P3",
            Self::BinaryMono => "P4",
            Self::BinaryGray => "P5",
            Self::BinaryColor => "P6",
        }
    }

    pub fn is_bitonal(&self) -> bool {
        matches!(self, Self::AsciiMono | Self::BinaryMono)
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::BinaryMono | Self::BinaryGray | Self::BinaryColor)
    }

    pub fn is_color(&self) -> bool {
        matches!(self, Self::AsciiColor | Self::BinaryColor)
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        if self.is_color() {
            3
        } else {
            1
        }
    }
}

impl Display for NetpbmFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AsciiMono => "ASCII bitonal",
            Self::AsciiGray => "ASCII grayscale",
            Self::AsciiColor => "ASCII color",
            Self::BinaryMono => "binary bitonal",
            Self::BinaryGray => "binary grayscale",
            Self::BinaryColor => "binary color",
        };
        write!(f, "{} ({})", self.magic(), name)
    }
}
