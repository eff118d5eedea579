//! Inline images (`BI ... ID ... EI`).
//!
//! Inline image dictionaries usually use abbreviated keys and values (`/W`,
//! `/CS /RGB`, `/F /Fl`). The parameters are stored exactly as read so that
//! they are written back verbatim; the accessors below accept either spelling.

use crate::object::{Dictionary, Object};
use phf::phf_map;

/// Abbreviated inline image keys and their full names.
static KEY_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "BPC" => "BitsPerComponent",
    "CS" => "ColorSpace",
    "D" => "Decode",
    "DP" => "DecodeParms",
    "F" => "Filter",
    "H" => "Height",
    "IM" => "ImageMask",
    "I" => "Interpolate",
    "W" => "Width",
    "L" => "Length",
};

/// Abbreviated color space names (ISO 32000-1:2008, Table 93).
static COLOR_SPACE_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "G" => "DeviceGray",
    "RGB" => "DeviceRGB",
    "CMYK" => "DeviceCMYK",
    "I" => "Indexed",
};

/// Abbreviated filter names (ISO 32000-1:2008, Table 94).
static FILTER_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "AHx" => "ASCIIHexDecode",
    "A85" => "ASCII85Decode",
    "LZW" => "LZWDecode",
    "Fl" => "FlateDecode",
    "RL" => "RunLengthDecode",
    "CCF" => "CCITTFaxDecode",
    "DCT" => "DCTDecode",
};

/// Expand an abbreviated inline image key; unknown keys are returned as-is.
pub fn expand_key(key: &str) -> &str {
    KEY_ABBREVIATIONS.get(key).copied().unwrap_or(key)
}

/// Expand an abbreviated color space name; unknown names are returned as-is.
pub fn expand_color_space(name: &str) -> &str {
    COLOR_SPACE_ABBREVIATIONS.get(name).copied().unwrap_or(name)
}

/// Expand an abbreviated filter name; unknown names are returned as-is.
pub fn expand_filter(name: &str) -> &str {
    FILTER_ABBREVIATIONS.get(name).copied().unwrap_or(name)
}

fn filter_name(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(name) => Some(match name.as_str() {
            Some(text) => expand_filter(text).to_string(),
            None => name.to_string(),
        }),
        _ => None,
    }
}

/// An image embedded directly in a content stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineImage {
    params: Dictionary,
    data: Vec<u8>,
}

impl InlineImage {
    /// Create an inline image from its parameters and raw (still filtered) data.
    pub fn new(params: Dictionary, data: Vec<u8>) -> Self {
        Self { params, data }
    }

    /// Parameters in the order they were read.
    pub fn params(&self) -> &Dictionary {
        &self.params
    }

    /// Raw image bytes between `ID` and `EI`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Look up a parameter by abbreviated or full key.
    ///
    /// ```
    /// use pdf_content_codec::content::InlineImage;
    /// use pdf_content_codec::object::{Dictionary, Object};
    ///
    /// let mut params = Dictionary::new();
    /// params.insert("W".into(), Object::Integer(8));
    /// let image = InlineImage::new(params, vec![0; 8]);
    /// assert_eq!(image.get("Width"), Some(&Object::Integer(8)));
    /// assert_eq!(image.get("W"), Some(&Object::Integer(8)));
    /// ```
    pub fn get(&self, key: &str) -> Option<&Object> {
        let full = expand_key(key);
        self.params
            .iter()
            .find(|(k, _)| k.as_str().map(expand_key) == Some(full))
            .map(|(_, v)| v)
    }

    /// Image width in samples.
    pub fn width(&self) -> Option<i64> {
        self.get("W").and_then(Object::as_integer)
    }

    /// Image height in samples.
    pub fn height(&self) -> Option<i64> {
        self.get("H").and_then(Object::as_integer)
    }

    /// Bits per color component. Image masks always use 1.
    pub fn bits_per_component(&self) -> Option<i64> {
        if self.image_mask() {
            return Some(1);
        }
        self.get("BPC").and_then(Object::as_integer)
    }

    /// Color space, with device abbreviations expanded.
    ///
    /// Returns the name for named color spaces and the family name (first
    /// element) for array color spaces such as `[/I /RGB 1 <...>]`.
    pub fn color_space(&self) -> Option<String> {
        let name = match self.get("CS")? {
            Object::Name(name) => name.as_str()?,
            Object::Array(items) => items.first()?.as_name()?,
            _ => return None,
        };
        Some(expand_color_space(name).to_string())
    }

    /// Filters in application order, with abbreviations expanded.
    pub fn filters(&self) -> Vec<String> {
        match self.get("F") {
            Some(name @ Object::Name(_)) => filter_name(name).into_iter().collect(),
            Some(Object::Array(items)) => items.iter().filter_map(filter_name).collect(),
            _ => Vec::new(),
        }
    }

    /// Filter parameters, if any.
    pub fn decode_parms(&self) -> Option<&Object> {
        self.get("DP")
    }

    /// Decode array, if any.
    pub fn decode(&self) -> Option<&[Object]> {
        self.get("D").and_then(Object::as_array).map(Vec::as_slice)
    }

    /// Whether image interpolation is requested.
    pub fn interpolate(&self) -> bool {
        self.get("I").and_then(Object::as_bool).unwrap_or(false)
    }

    /// Whether this image is a stencil mask.
    pub fn image_mask(&self) -> bool {
        self.get("IM").and_then(Object::as_bool).unwrap_or(false)
    }

    /// Number of color components per sample.
    ///
    /// Indexed images and masks have one; unknown color spaces give `None`.
    pub fn components(&self) -> Option<u32> {
        if self.image_mask() {
            return Some(1);
        }
        match self.color_space()?.as_str() {
            "DeviceGray" | "CalGray" | "Indexed" | "Separation" => Some(1),
            "DeviceRGB" | "CalRGB" | "Lab" => Some(3),
            "DeviceCMYK" => Some(4),
            _ => None,
        }
    }

    /// Byte length the unfiltered image data should have.
    ///
    /// Each row is padded to a whole byte: `ceil(W * components * BPC / 8) * H`.
    pub fn expected_data_len(&self) -> Option<usize> {
        let width = usize::try_from(self.width()?).ok()?;
        let height = usize::try_from(self.height()?).ok()?;
        let bpc = usize::try_from(self.bits_per_component()?).ok()?;
        let components = self.components()? as usize;

        let row_bits = width.checked_mul(components)?.checked_mul(bpc)?;
        row_bits.div_ceil(8).checked_mul(height)
    }
}
