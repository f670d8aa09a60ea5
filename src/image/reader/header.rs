use std::io::{ErrorKind, Read};

use super::NetpbmFormat;
use crate::error::Error;
use crate::Result;

/// Splits a stream into whitespace separated ASCII tokens, dropping `#`
/// comments. Exactly one delimiter byte after each token is consumed.
pub(super) struct Tokenizer<'a, R: Read> {
    reader: &'a mut R,
    buffer: Vec<u8>,
}

impl<'a, R: Read> Tokenizer<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Tokenizer {
            reader,
            buffer: Vec::new(),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0; 1];
        loop {
            return match self.reader.read(&mut byte) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => Err(Error::Io(e)),
            };
        }
    }

    pub fn next_token(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let mut in_comment = false;

        while let Some(byte) = self.read_byte()? {
            if in_comment {
                if byte == b'\n' || byte == b'\r' {
                    in_comment = false;
                    if !self.buffer.is_empty() {
                        break;
                    }
                }
                continue;
            }
            if byte == b'#' {
                in_comment = true;
                continue;
            }
            if byte.is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte);
            }
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }
}

impl<R: Read> Iterator for Tokenizer<'_, R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

const MAGIC_HEADER_TOKEN_NAME: &str = "Magic Header";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";

const MAX_SAMPLE_VALUE: u32 = u16::MAX as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetpbmHeader {
    pub format: NetpbmFormat,
    pub width: u32,
    pub height: u32,
    /// largest sample value, `1` for bitonal formats
    pub max_value: u32,
}

impl NetpbmHeader {
    /// Distinct values a single sample can take.
    pub fn sample_levels(&self) -> u32 {
        self.max_value + 1
    }

    pub fn bytes_per_sample(&self) -> usize {
        if self.max_value > u8::MAX as u32 {
            2
        } else {
            1
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

pub(super) struct HeaderParser<'a, T> {
    tokenizer: &'a mut T,
}

impl<'a, T> HeaderParser<'a, T>
where
    T: Iterator<Item = Result<String>>,
{
    pub fn new(tokenizer: &'a mut T) -> Self {
        Self { tokenizer }
    }

    pub fn parse_tokens(&mut self, format: NetpbmFormat) -> Result<NetpbmHeader> {
        let magic = self.next_token(MAGIC_HEADER_TOKEN_NAME)?;
        Self::check_magic(&magic, format)?;
        let width = self.parse_positive(WIDTH_HEADER_TOKEN_NAME, u32::MAX)?;
        let height = self.parse_positive(HEIGHT_HEADER_TOKEN_NAME, u32::MAX)?;
        let max_value = if format.is_bitonal() {
            1
        } else {
            self.parse_positive(MAX_VALUE_HEADER_TOKEN_NAME, MAX_SAMPLE_VALUE)?
        };
        Ok(NetpbmHeader {
            format,
            width,
            height,
            max_value,
        })
    }

    fn check_magic(magic: &str, format: NetpbmFormat) -> Result<()> {
        if magic != format.magic() {
            return Err(Error::MalformedHeader(MAGIC_HEADER_TOKEN_NAME));
        }
        Ok(())
    }

    fn next_token(&mut self, token_name: &'static str) -> Result<String> {
        self.tokenizer
            .next()
            .ok_or(Error::MalformedHeader(token_name))?
    }

    fn parse_positive(&mut self, token_name: &'static str, limit: u32) -> Result<u32> {
        let token = self.next_token(token_name)?;
        if !token.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::MalformedHeader(token_name));
        }
        match token.parse::<u32>() {
            Ok(value) if value > 0 && value <= limit => Ok(value),
            _ => Err(Error::MalformedHeader(token_name)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{HeaderParser, NetpbmHeader, Tokenizer};
    use crate::error::Error;
    use crate::image::NetpbmFormat;
    use crate::Result;

    fn parse_header(input: &str, format: NetpbmFormat) -> Result<NetpbmHeader> {
        let mut bytes = input.as_bytes();
        let mut tokenizer = Tokenizer::new(&mut bytes);
        HeaderParser::new(&mut tokenizer).parse_tokens(format)
    }

    fn tokens(input: &str) -> Vec<String> {
        let mut bytes = input.as_bytes();
        Tokenizer::new(&mut bytes)
            .collect::<Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn tokenize_with_comments() {
        let tokens = tokens("P2\n# a comment 12 34\n  3\t2\n#another\n255 1#tail\n2");
        assert_eq!(tokens, vec!["P2", "3", "2", "255", "1", "2"]);
    }

    #[test]
    fn tokenizer_consumes_one_delimiter() {
        let mut bytes: &[u8] = b"P5 1 1 255\n\n\x07";
        let mut tokenizer = Tokenizer::new(&mut bytes);
        for _ in 0..4 {
            tokenizer.next_token().unwrap();
        }
        assert_eq!(bytes, b"\n\x07");
    }

    #[test]
    fn bitonal_header() {
        let header = parse_header("P1\n# comment\n13 21\n", NetpbmFormat::AsciiMono).unwrap();
        assert_eq!(header.width, 13);
        assert_eq!(header.height, 21);
        assert_eq!(header.max_value, 1);
        assert_eq!(header.sample_levels(), 2);
        assert_eq!(header.pixel_count(), 273);
    }

    #[test]
    fn grayscale_header() {
        let header = parse_header("P5 4\n2 65535 ", NetpbmFormat::BinaryGray).unwrap();
        assert_eq!(header.width, 4);
        assert_eq!(header.height, 2);
        assert_eq!(header.max_value, 65535);
        assert_eq!(header.bytes_per_sample(), 2);
    }

    #[test]
    fn magic_must_match_format() {
        assert!(matches!(
            parse_header("P2 1 1 255", NetpbmFormat::AsciiMono),
            Err(Error::MalformedHeader("Magic Header"))
        ));
    }

    #[test]
    fn missing_height() {
        assert!(matches!(
            parse_header("P1\n13", NetpbmFormat::AsciiMono),
            Err(Error::MalformedHeader("Height Header"))
        ));
    }

    #[test]
    fn zero_width() {
        assert!(matches!(
            parse_header("P4\n0 2\n", NetpbmFormat::BinaryMono),
            Err(Error::MalformedHeader("Width Header"))
        ));
    }

    #[test]
    fn non_numeric_dimension() {
        assert!(matches!(
            parse_header("P4\n4 two\n", NetpbmFormat::BinaryMono),
            Err(Error::MalformedHeader("Height Header"))
        ));
        assert!(matches!(
            parse_header("P4\n-4 2\n", NetpbmFormat::BinaryMono),
            Err(Error::MalformedHeader("Width Header"))
        ));
        assert!(matches!(
            parse_header("P4\n+4 2\n", NetpbmFormat::BinaryMono),
            Err(Error::MalformedHeader("Width Header"))
        ));
    }

    #[test]
    fn dimension_overflow() {
        assert!(matches!(
            parse_header("P4\n4294967296 2\n", NetpbmFormat::BinaryMono),
            Err(Error::MalformedHeader("Width Header"))
        ));
    }

    #[test]
    fn max_value_out_of_range() {
        assert!(matches!(
            parse_header("P2 1 1 0", NetpbmFormat::AsciiGray),
            Err(Error::MalformedHeader("Max Value Header"))
        ));
        assert!(matches!(
            parse_header("P6 1 1 65536", NetpbmFormat::BinaryColor),
            Err(Error::MalformedHeader("Max Value Header"))
        ));
        assert!(matches!(
            parse_header("P3 1 1", NetpbmFormat::AsciiColor),
            Err(Error::MalformedHeader("Max Value Header"))
        ));
    }
}
