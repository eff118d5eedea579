//! Stream decoder implementations for the filters content streams use.
//!
//! - FlateDecode (zlib/deflate) - by far the most common
//! - ASCIIHexDecode - hexadecimal encoding
//! - ASCII85Decode - base85 encoding
//!
//! Filters are applied in the order they appear in the `/Filter` entry.
//! The abbreviated names allowed in inline image dictionaries (`Fl`, `AHx`,
//! `A85`) are accepted as well.

use crate::error::{Error, Result};
use crate::parser_config::ParserOptions;

mod ascii85;
mod ascii_hex;
mod flate;

pub use ascii85::Ascii85Decoder;
pub use ascii_hex::AsciiHexDecoder;
pub use flate::FlateDecoder;

/// PDF stream filter types supported for content streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// FlateDecode (deflate/zlib compression)
    FlateDecode,
    /// ASCIIHexDecode (hexadecimal encoding)
    ASCIIHexDecode,
    /// ASCII85Decode (base-85 encoding)
    ASCII85Decode,
}

impl Filter {
    /// Look up a filter by its full or abbreviated name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FlateDecode" | "Fl" => Some(Filter::FlateDecode),
            "ASCIIHexDecode" | "AHx" => Some(Filter::ASCIIHexDecode),
            "ASCII85Decode" | "A85" => Some(Filter::ASCII85Decode),
            _ => None,
        }
    }

    fn decoder(self, options: &ParserOptions) -> Box<dyn StreamDecoder> {
        match self {
            Filter::FlateDecode => {
                Box::new(FlateDecoder::with_limit(options.max_decompressed_size))
            },
            Filter::ASCIIHexDecode => Box::new(AsciiHexDecoder),
            Filter::ASCII85Decode => Box::new(Ascii85Decoder),
        }
    }
}

/// Trait for PDF stream decoders.
pub trait StreamDecoder {
    /// Decode the input data.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Get the name of this decoder (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

/// Decode stream data using a filter pipeline with default limits.
pub fn decode_stream(data: &[u8], filters: &[String]) -> Result<Vec<u8>> {
    decode_stream_with_options(data, filters, &ParserOptions::default())
}

/// Decode stream data with decompression bomb protection.
///
/// The ratio and size limits from `options` are checked after every filter.
/// FlateDecode also stops inflating as soon as the size limit is passed.
pub fn decode_stream_with_options(
    data: &[u8],
    filters: &[String],
    options: &ParserOptions,
) -> Result<Vec<u8>> {
    let compressed_size = data.len().max(1);
    let mut current = data.to_vec();

    for filter_name in filters {
        let filter = Filter::from_name(filter_name)
            .ok_or_else(|| Error::UnsupportedFilter(filter_name.clone()))?;
        let decoder = filter.decoder(options);

        current = decoder.decode(&current)?;
        log::trace!("{} produced {} bytes", decoder.name(), current.len());

        if options.max_decompression_ratio > 0 {
            let ratio = current.len() as u64 / compressed_size as u64;
            if ratio > options.max_decompression_ratio as u64 {
                return Err(Error::Decode(format!(
                    "Decompression bomb detected: ratio {}:1 exceeds limit {}:1",
                    ratio, options.max_decompression_ratio
                )));
            }
        }

        if options.max_decompressed_size > 0 && current.len() > options.max_decompressed_size {
            return Err(Error::Decode(format!(
                "Decompressed size {} bytes exceeds limit {} bytes",
                current.len(),
                options.max_decompressed_size
            )));
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stream_no_filters() {
        let data = b"q 1 0 0 1 0 0 cm Q";
        assert_eq!(decode_stream(data, &[]).unwrap(), data);
    }

    #[test]
    fn test_decode_stream_unsupported_filter() {
        let filters = vec!["DCTDecode".to_string()];
        match decode_stream(b"test", &filters) {
            Err(Error::UnsupportedFilter(name)) => assert_eq!(name, "DCTDecode"),
            other => panic!("Expected UnsupportedFilter error, got {:?}", other),
        }
    }

    #[test]
    fn test_abbreviated_filter_names() {
        assert_eq!(Filter::from_name("AHx"), Some(Filter::ASCIIHexDecode));
        assert_eq!(Filter::from_name("Fl"), Some(Filter::FlateDecode));
        assert_eq!(Filter::from_name("A85"), Some(Filter::ASCII85Decode));
        assert_eq!(Filter::from_name("LZW"), None);
    }

    #[test]
    fn test_decode_stream_chain() {
        // ASCIIHex of the ASCII85 encoding of "Test"
        let filters = vec!["AHx".to_string(), "ASCII85Decode".to_string()];
        let data = b"3C2B552C6D7E3E";
        assert_eq!(decode_stream(data, &filters).unwrap(), b"Test");
    }

    #[test]
    fn test_flate_stops_at_size_limit() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&vec![b'q'; 1 << 20]).unwrap();
        let compressed = encoder.finish().unwrap();

        let options = ParserOptions {
            max_decompressed_size: 1024,
            max_decompression_ratio: 0,
            ..ParserOptions::default()
        };
        let filters = vec!["FlateDecode".to_string()];
        let result = decode_stream_with_options(&compressed, &filters, &options);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decompressed_size_limit() {
        let options = ParserOptions {
            max_decompressed_size: 2,
            max_decompression_ratio: 0,
            ..ParserOptions::default()
        };
        let filters = vec!["ASCIIHexDecode".to_string()];
        let result = decode_stream_with_options(b"414243", &filters, &options);
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
