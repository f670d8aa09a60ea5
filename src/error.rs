use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    UnsupportedFormat(Option<[u8; 2]>),
    MalformedHeader(&'static str),
    TruncatedData { expected: usize, actual: usize },
    MalformedPixelData(usize),
    InvalidDimension(&'static str),
    InvalidValue { value: u32, colors: u32 },
    OutOfRange { index: usize, length: usize },
    Uninitialized(usize),
    SizeMismatch { expected: usize, actual: usize },
    AllocationFailed { words: usize },
    Io(std::io::Error),
    UnableToOpenInputFileForReading(String, std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(Some(magic)) => {
                write!(
                    f,
                    "Unsupported image format, magic bytes {:02X} {:02X}",
                    magic[0], magic[1]
                )
            }
            Self::UnsupportedFormat(None) => {
                write!(f, "Unsupported image format, input too short")
            }
            Self::MalformedHeader(token_name) => {
                write!(f, "Header token '{}' is missing or malformed", token_name)
            }
            Self::TruncatedData { expected, actual } => {
                write!(
                    f,
                    "Pixel data truncated. Expected {} bytes, but got {}.",
                    expected, actual
                )
            }
            Self::MalformedPixelData(sample_index) => {
                write!(
                    f,
                    "Sample {} is missing or is not a decimal number",
                    sample_index
                )
            }
            Self::InvalidDimension(name) => {
                write!(f, "Dimension '{}' must be greater than zero", name)
            }
            Self::InvalidValue { value, colors } => {
                write!(
                    f,
                    "Value {} does not fit into a bitmap of {} colors",
                    value, colors
                )
            }
            Self::OutOfRange { index, length } => {
                write!(f, "Index {} is out of range for length {}", index, length)
            }
            Self::Uninitialized(index) => {
                write!(f, "Pixel at index {} was never written", index)
            }
            Self::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Storage size mismatch. Expected {} entries, but found {}.",
                    expected, actual
                )
            }
            Self::AllocationFailed { words } => {
                write!(f, "Unable to allocate storage of {} words", words)
            }
            Self::Io(error) => {
                write!(f, "Reading of input stream failed: {}", error)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) | Self::UnableToOpenInputFileForReading(_, error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
