//! Primitive value framing over a byte stream
//!
//! Every multi-byte value on the wire is little-endian. Readers pull bytes
//! into an internal buffer until a whole value is available, so a value is
//! either returned complete or not at all. Writers only touch an in-memory
//! buffer; nothing reaches the stream until [`WireWriter::flush`].

use bytes::{Buf, BufMut, BytesMut};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum length-prefixed payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Length prefix used on the wire for a null payload
const NULL_LENGTH: i32 = -1;

/// Bytes requested from the stream per read call
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Framing errors
#[derive(Error, Debug)]
pub enum FramingError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unexpected end of stream: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    #[error("Invalid length prefix: {0}")]
    InvalidLength(i32),

    #[error("Payload too large: {0} bytes (max: {1})")]
    PayloadTooLarge(usize, usize),

    #[error("Invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub type FramingResult<T> = Result<T, FramingError>;

/// Validate a length/count prefix, mapping the null marker to `None`
fn checked_len(prefix: i32, element_size: usize) -> FramingResult<Option<usize>> {
    if prefix == NULL_LENGTH {
        return Ok(None);
    }
    if prefix < 0 {
        return Err(FramingError::InvalidLength(prefix));
    }

    let len = prefix as usize;
    let total = len.saturating_mul(element_size);
    if total > MAX_PAYLOAD_SIZE {
        return Err(FramingError::PayloadTooLarge(total, MAX_PAYLOAD_SIZE));
    }
    Ok(Some(len))
}

/// Reads primitive values from a buffered byte stream
pub struct WireReader<R> {
    /// Underlying stream
    inner: R,
    /// Bytes received but not yet consumed
    buf: BytesMut,
    /// Total bytes pulled from the stream
    bytes_read: u64,
}

impl<R> WireReader<R> {
    /// Create a reader over a stream
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            bytes_read: 0,
        }
    }

    /// Total bytes received from the stream so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Bytes received but not yet decoded
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the reader, returning the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> WireReader<R> {
    /// Make sure at least `needed` bytes are buffered
    async fn fill(&mut self, needed: usize) -> FramingResult<()> {
        while self.buf.len() < needed {
            self.buf.reserve(READ_CHUNK_SIZE.max(needed - self.buf.len()));
            let n = self.inner.read_buf(&mut self.buf).await?;

            if n == 0 {
                return Err(FramingError::UnexpectedEof {
                    needed,
                    available: self.buf.len(),
                });
            }
            self.bytes_read += n as u64;
        }
        Ok(())
    }

    pub async fn read_u8(&mut self) -> FramingResult<u8> {
        self.fill(1).await?;
        Ok(self.buf.get_u8())
    }

    /// Read a one-byte boolean (any nonzero byte is true)
    pub async fn read_bool(&mut self) -> FramingResult<bool> {
        Ok(self.read_u8().await? != 0)
    }

    pub async fn read_i32(&mut self) -> FramingResult<i32> {
        self.fill(4).await?;
        Ok(self.buf.get_i32_le())
    }

    pub async fn read_i64(&mut self) -> FramingResult<i64> {
        self.fill(8).await?;
        Ok(self.buf.get_i64_le())
    }

    pub async fn read_f64(&mut self) -> FramingResult<f64> {
        self.fill(8).await?;
        Ok(self.buf.get_f64_le())
    }

    /// Read a length-prefixed byte payload (`None` for the null marker)
    pub async fn read_bytes(&mut self) -> FramingResult<Option<Vec<u8>>> {
        let prefix = self.read_i32().await?;
        let Some(len) = checked_len(prefix, 1)? else {
            return Ok(None);
        };

        self.fill(len).await?;
        Ok(Some(self.buf.split_to(len).to_vec()))
    }

    /// Read a length-prefixed UTF-8 string
    pub async fn read_string(&mut self) -> FramingResult<Option<String>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    /// Read a count-prefixed array of i32 (a null array reads as empty)
    pub async fn read_i32_array(&mut self) -> FramingResult<Vec<i32>> {
        let prefix = self.read_i32().await?;
        let Some(count) = checked_len(prefix, 4)? else {
            return Ok(Vec::new());
        };

        self.fill(count * 4).await?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.buf.get_i32_le());
        }
        Ok(values)
    }
}

/// Writes primitive values into a buffer that is sent on flush
pub struct WireWriter<W> {
    /// Underlying stream
    inner: W,
    /// Bytes of the message being assembled
    buf: BytesMut,
    /// Total bytes flushed to the stream
    bytes_written: u64,
}

impl<W> WireWriter<W> {
    /// Create a writer over a stream
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(256),
            bytes_written: 0,
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(value as u8);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    /// Write a length-prefixed byte payload (`None` writes the null marker)
    pub fn write_bytes(&mut self, payload: Option<&[u8]>) {
        match payload {
            Some(bytes) => {
                self.buf.put_i32_le(bytes.len() as i32);
                self.buf.put_slice(bytes);
            }
            None => self.buf.put_i32_le(NULL_LENGTH),
        }
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(Some(value.as_bytes()));
    }

    pub fn write_i32_array(&mut self, values: &[i32]) {
        self.buf.put_i32_le(values.len() as i32);
        for value in values {
            self.buf.put_i32_le(*value);
        }
    }

    /// Bytes written since the last flush
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Total bytes flushed to the stream so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer, returning the underlying stream. Unflushed bytes are dropped.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> WireWriter<W> {
    /// Send everything buffered since the last flush as one unit
    pub async fn flush(&mut self) -> FramingResult<()> {
        self.inner.write_all(&self.buf).await?;
        self.inner.flush().await?;

        self.bytes_written += self.buf.len() as u64;
        self.buf.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    async fn encoded(build: impl FnOnce(&mut WireWriter<Vec<u8>>)) -> Vec<u8> {
        let mut writer = WireWriter::new(Vec::new());
        build(&mut writer);
        writer.flush().await.unwrap();
        writer.into_inner()
    }

    #[tokio::test]
    async fn test_primitives_are_little_endian() {
        let bytes = encoded(|w| {
            w.write_i32(1);
            w.write_i64(-2);
        })
        .await;

        assert_eq!(&bytes[..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..], &(-2i64).to_le_bytes());
    }

    #[tokio::test]
    async fn test_read_primitives() {
        let bytes = encoded(|w| {
            w.write_bool(true);
            w.write_u8(127);
            w.write_i32(-17);
            w.write_i64(42);
            w.write_f64(1024.0);
            w.write_string("token");
            w.write_i32_array(&[1, 5, 9]);
        })
        .await;

        let mut reader = WireReader::new(bytes.as_slice());
        assert!(reader.read_bool().await.unwrap());
        assert_eq!(reader.read_u8().await.unwrap(), 127);
        assert_eq!(reader.read_i32().await.unwrap(), -17);
        assert_eq!(reader.read_i64().await.unwrap(), 42);
        assert_eq!(reader.read_f64().await.unwrap(), 1024.0);
        assert_eq!(reader.read_string().await.unwrap().as_deref(), Some("token"));
        assert_eq!(reader.read_i32_array().await.unwrap(), vec![1, 5, 9]);
        assert_eq!(reader.buffered(), 0);
        assert_eq!(reader.bytes_read(), bytes.len() as u64);
    }

    #[tokio::test]
    async fn test_null_payloads() {
        let bytes = encoded(|w| {
            w.write_bytes(None);
            w.write_i32(-1);
        })
        .await;

        let mut reader = WireReader::new(bytes.as_slice());
        assert_eq!(reader.read_bytes().await.unwrap(), None);
        assert!(reader.read_i32_array().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_short_read_is_framing_error() {
        let bytes = [1u8, 2, 3];
        let mut reader = WireReader::new(&bytes[..]);

        match reader.read_i64().await {
            Err(FramingError::UnexpectedEof { needed, available }) => {
                assert_eq!(needed, 8);
                assert_eq!(available, 3);
            }
            other => panic!("Expected UnexpectedEof, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsatisfiable_length() {
        // Declares 10 bytes, carries 2
        let bytes = encoded(|w| {
            w.write_i32(10);
            w.write_u8(1);
            w.write_u8(2);
        })
        .await;
        let mut reader = WireReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_bytes().await,
            Err(FramingError::UnexpectedEof { .. })
        ));

        let bytes = encoded(|w| w.write_i32(-5)).await;
        let mut reader = WireReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_i32_array().await,
            Err(FramingError::InvalidLength(-5))
        ));

        let bytes = encoded(|w| w.write_i32(i32::MAX)).await;
        let mut reader = WireReader::new(bytes.as_slice());
        assert!(matches!(
            reader.read_bytes().await,
            Err(FramingError::PayloadTooLarge(..))
        ));
    }

    #[tokio::test]
    async fn test_flush_sends_one_unit() {
        let mut expected = vec![2u8];
        expected.extend_from_slice(&3i32.to_le_bytes());
        expected.extend_from_slice(b"abc");

        let mock = Builder::new().write(&expected).build();
        let mut writer = WireWriter::new(mock);
        writer.write_u8(2);
        writer.write_string("abc");
        assert_eq!(writer.pending(), expected.len());

        writer.flush().await.unwrap();
        assert_eq!(writer.pending(), 0);
        assert_eq!(writer.bytes_written(), expected.len() as u64);
    }
}
