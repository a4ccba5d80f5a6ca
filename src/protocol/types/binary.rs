//! Streaming access to binary (X/XSTRING) outputs.
//!
//! A binary output can be read two ways:
//! 1. **Buffered**: the whole payload as `Bytes`
//! 2. **Streamed**: an `RfcStream` implementing `std::io::Read`
//!
//! Both share the same reference-counted buffer, so the stream reads the
//! exact bytes the buffered accessor returns without copying them first.

use bytes::buf::Reader;
use bytes::{Buf, Bytes};
use std::io::{self, Read};

/// Lazily-read byte stream over a binary output.
#[derive(Debug)]
pub struct RfcStream {
    total: usize,
    reader: Reader<Bytes>,
}

impl RfcStream {
    /// Create a stream positioned at the start of `data`.
    pub fn new(data: Bytes) -> Self {
        Self {
            total: data.len(),
            reader: data.reader(),
        }
    }

    /// Total payload size in bytes.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Bytes not read yet.
    pub fn remaining(&self) -> usize {
        self.reader.get_ref().remaining()
    }

    /// The unread part of the payload.
    pub fn into_remaining(self) -> Bytes {
        self.reader.into_inner()
    }
}

impl Read for RfcStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_reads_all_bytes() {
        let data = Bytes::from_static(b"BM\x36\x00\x00\x00");
        let mut stream = RfcStream::new(data.clone());
        assert_eq!(stream.len(), 6);

        let mut read = Vec::new();
        stream.read_to_end(&mut read).unwrap();
        assert_eq!(read, data.to_vec());
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    fn test_stream_partial_read() {
        let mut stream = RfcStream::new(Bytes::from_static(b"hello"));
        let mut buf = [0u8; 2];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"he");
        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.into_remaining(), Bytes::from_static(b"llo"));
    }

    #[test]
    fn test_empty_stream() {
        let stream = RfcStream::new(Bytes::new());
        assert!(stream.is_empty());
    }
}
