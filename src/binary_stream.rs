use std::io;
use std::io::{ErrorKind, Read};

/// A reader that can look at upcoming bytes without consuming them
pub struct LookaheadReader<R: Read> {
    /// the underlying input stream
    reader: R,
    /// bytes already pulled from the stream but not yet handed out
    lookahead: Vec<u8>,
    /// how many bytes of lookahead were already handed out
    position: usize,
}

impl<R: Read> LookaheadReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lookahead: Vec::new(),
            position: 0,
        }
    }

    /// look at the next `count` bytes
    ///
    /// The returned slice is shorter than `count` only if the
    /// underlying stream ended. The bytes are handed out again
    /// by the next reads.
    pub fn peek(&mut self, count: usize) -> io::Result<&[u8]> {
        while self.available() < count {
            let mut chunk = vec![0; count - self.available()];
            let read = match self.reader.read(&mut chunk) {
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if read == 0 {
                break;
            }
            self.lookahead.extend_from_slice(&chunk[..read]);
        }
        let end = self.position + count.min(self.available());
        Ok(&self.lookahead[self.position..end])
    }

    fn available(&self) -> usize {
        self.lookahead.len() - self.position
    }
}

impl<R: Read> Read for LookaheadReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.available() == 0 {
            return self.reader.read(buf);
        }
        let count = self.available().min(buf.len());
        buf[..count].copy_from_slice(&self.lookahead[self.position..self.position + count]);
        self.position += count;
        if self.available() == 0 {
            self.lookahead.clear();
            self.position = 0;
        }
        Ok(count)
    }
}

/// State for reading individual bits from a Reader, most significant bit first
pub struct BitReader<'a, T: Read> {
    /// the underlying input stream
    reader: &'a mut T,
    /// the byte currently being split into bits
    buffer: u8,
    /// how many bits of the buffer were not handed out yet
    bits_remaining: u8,
    /// how many bytes were pulled from the stream so far
    bytes_read: usize,
}

impl<'a, T: Read> BitReader<'a, T> {
    pub fn new(reader: &'a mut T) -> BitReader<'a, T> {
        BitReader {
            reader,
            buffer: 0,
            bits_remaining: 0,
            bytes_read: 0,
        }
    }

    /// read the next bit
    ///
    /// fails with `UnexpectedEof` once the stream is exhausted
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.bits_remaining == 0 {
            let mut byte = [0; 1];
            self.reader.read_exact(&mut byte)?;
            self.buffer = byte[0];
            self.bits_remaining = 8;
            self.bytes_read += 1;
        }
        self.bits_remaining -= 1;
        Ok(self.buffer & (1 << self.bits_remaining) != 0)
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}

#[cfg(test)]
mod test {
    use super::{BitReader, LookaheadReader};
    use std::io::{ErrorKind, Read};

    #[test]
    fn peek_does_not_consume() {
        let input: &[u8] = b"P4\n1 1\n";
        let mut reader = LookaheadReader::new(input);
        assert_eq!(reader.peek(2).expect("peek failed"), b"P4");
        assert_eq!(reader.peek(1).expect("peek failed"), b"P");
        let mut content = Vec::new();
        reader.read_to_end(&mut content).expect("read failed");
        assert_eq!(content, b"P4\n1 1\n");
    }

    #[test]
    fn peek_past_end() {
        let input: &[u8] = b"P";
        let mut reader = LookaheadReader::new(input);
        assert_eq!(reader.peek(2).expect("peek failed"), b"P");
        let mut content = Vec::new();
        reader.read_to_end(&mut content).expect("read failed");
        assert_eq!(content, b"P");
    }

    #[test]
    fn partial_reads_from_lookahead() {
        let input: &[u8] = &[1, 2, 3, 4];
        let mut reader = LookaheadReader::new(input);
        reader.peek(3).expect("peek failed");
        let mut buffer = [0; 2];
        assert_eq!(reader.read(&mut buffer).expect("read failed"), 2);
        assert_eq!(buffer, [1, 2]);
        assert_eq!(reader.peek(2).expect("peek failed"), &[3, 4]);
        let mut buffer = [0; 4];
        assert_eq!(reader.read(&mut buffer).expect("read failed"), 2);
        assert_eq!(&buffer[..2], &[3, 4]);
        assert_eq!(reader.read(&mut buffer).expect("read failed"), 0);
    }

    #[test]
    fn bit_mode_test() {
        // 0b11000011 0b11110000
        let mut input: &[u8] = &[195, 15 << 4];
        let mut reader = BitReader::new(&mut input);
        let bits: Vec<bool> = (0..16).map(|_| reader.read_bit().expect("ERR")).collect();
        let expected = [
            true, true, false, false, false, false, true, true, true, true, true, true, false,
            false, false, false,
        ];
        assert_eq!(bits, expected);
        assert_eq!(reader.bytes_read(), 2);
    }

    #[test]
    fn end_of_stream() {
        let mut input: &[u8] = &[0xFF];
        let mut reader = BitReader::new(&mut input);
        for _ in 0..8 {
            reader.read_bit().expect("ERR");
        }
        let error = reader.read_bit().expect_err("stream should be exhausted");
        assert_eq!(error.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(reader.bytes_read(), 1);
    }
}
