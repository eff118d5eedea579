//! FlateDecode (zlib/deflate) implementation.
//!
//! Uses the flate2 crate. Content streams written by careless producers
//! sometimes carry a broken zlib wrapper or a truncated tail, so decoding
//! falls back to raw deflate and keeps any bytes recovered before an error.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// FlateDecode filter implementation.
///
/// Output is capped while inflating: a stream that would grow past
/// `max_output` bytes fails without being fully expanded in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateDecoder {
    /// Maximum output size in bytes, 0 for no limit
    max_output: usize,
}

impl FlateDecoder {
    /// Create a decoder without an output limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that fails once output exceeds `max_output` bytes.
    ///
    /// A limit of 0 disables the check.
    pub fn with_limit(max_output: usize) -> Self {
        Self { max_output }
    }

    fn read_capped<R: Read>(&self, mut reader: R, output: &mut Vec<u8>) -> std::io::Result<()> {
        match self.max_output {
            0 => reader.read_to_end(output)?,
            max => reader.take(max as u64 + 1).read_to_end(output)?,
        };
        Ok(())
    }

    fn check_limit(&self, output: Vec<u8>) -> Result<Vec<u8>> {
        if self.max_output > 0 && output.len() > self.max_output {
            return Err(Error::Decode(format!(
                "FlateDecode output exceeds limit of {} bytes",
                self.max_output
            )));
        }
        Ok(output)
    }
}

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();

        let zlib_err = match self.read_capped(ZlibDecoder::new(input), &mut output) {
            Ok(()) => return self.check_limit(output),
            Err(e) if !output.is_empty() => {
                log::warn!(
                    "FlateDecode partial recovery: kept {} bytes before corruption: {}",
                    output.len(),
                    e
                );
                return self.check_limit(output);
            },
            Err(e) => e,
        };

        log::debug!("Zlib decode failed ({}), trying raw deflate", zlib_err);
        output.clear();
        match self.read_capped(DeflateDecoder::new(input), &mut output) {
            Ok(()) if !output.is_empty() || input.is_empty() => self.check_limit(output),
            Err(_) if !output.is_empty() => {
                log::warn!("Raw deflate partial recovery: kept {} bytes", output.len());
                self.check_limit(output)
            },
            _ => Err(Error::Decode(format!("FlateDecode: {}", zlib_err))),
        }
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_flate_decode_simple() {
        let compressed = zlib(b"BT /F1 12 Tf (Hello) Tj ET");
        assert_eq!(FlateDecoder::new().decode(&compressed).unwrap(), b"BT /F1 12 Tf (Hello) Tj ET");
    }

    #[test]
    fn test_flate_decode_raw_deflate_fallback() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"q 1 0 0 1 0 0 cm Q").unwrap();
        let raw = encoder.finish().unwrap();
        assert_eq!(FlateDecoder::new().decode(&raw).unwrap(), b"q 1 0 0 1 0 0 cm Q");
    }

    #[test]
    fn test_flate_decode_invalid_data() {
        assert!(FlateDecoder::new().decode(b"\xFF\xFF\xFF\xFF not deflate").is_err());
    }

    #[test]
    fn test_flate_output_limit() {
        let compressed = zlib(&vec![0u8; 1_000_000]);
        assert!(compressed.len() < 4096);

        match FlateDecoder::with_limit(1024).decode(&compressed) {
            Err(Error::Decode(message)) => assert!(message.contains("1024"), "{}", message),
            other => panic!("expected Decode error, got {:?}", other.map(|v| v.len())),
        }
        let exact = FlateDecoder::with_limit(1_000_000).decode(&compressed).unwrap();
        assert_eq!(exact.len(), 1_000_000);
    }

    #[test]
    fn test_raw_deflate_output_limit() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[b' '; 10_000]).unwrap();
        let raw = encoder.finish().unwrap();
        assert!(matches!(FlateDecoder::with_limit(100).decode(&raw), Err(Error::Decode(_))));
    }

    #[test]
    fn test_flate_decoder_name() {
        assert_eq!(FlateDecoder::new().name(), "FlateDecode");
    }
}
