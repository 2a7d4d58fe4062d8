use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::ConverterError;

/// Output encodings the conversion engine can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        Self::Jpeg,
        Self::Png,
        Self::WebP,
        Self::Gif,
        Self::Bmp,
        Self::Tiff,
    ];

    /// Lowercase format name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Extension used for derived output names: `jpg` for JPEG, the format name otherwise.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            other => other.name(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Whether the encoder for this format consumes the quality setting.
    ///
    /// Only JPEG is lossy here; the WebP encoder is lossless. Other formats
    /// ignore quality rather than rejecting it.
    pub fn uses_quality(&self) -> bool {
        matches!(self, Self::Jpeg)
    }

    pub(crate) fn as_image_format(&self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::WebP => image::ImageFormat::WebP,
            Self::Gif => image::ImageFormat::Gif,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ConverterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::Gif),
            "bmp" => Ok(Self::Bmp),
            "tif" | "tiff" => Ok(Self::Tiff),
            _ => Err(ConverterError::format(format!(
                "Unsupported output format: {}", name
            ))),
        }
    }
}

/// Derives the download name for a converted file:
/// `"<name-without-extension>_converted.<extension>"`.
///
/// A name without an extension (or a bare dotfile) keeps its whole text as the stem.
pub fn converted_file_name(original_name: &str, format: OutputFormat) -> String {
    let stem = match original_name.rfind('.') {
        Some(idx) if idx > 0 => &original_name[..idx],
        _ => original_name,
    };
    format!("{stem}_converted.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(" webp ".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert_eq!("tif".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
        assert!(matches!(
            "heic".parse::<OutputFormat>(),
            Err(ConverterError::Format(_))
        ));
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_converted_file_name() {
        assert_eq!(converted_file_name("photo.png", OutputFormat::Jpeg), "photo_converted.jpg");
        assert_eq!(converted_file_name("photo.png", OutputFormat::WebP), "photo_converted.webp");
        assert_eq!(
            converted_file_name("archive.tar.png", OutputFormat::Png),
            "archive.tar_converted.png"
        );
        assert_eq!(converted_file_name("README", OutputFormat::Gif), "README_converted.gif");
        assert_eq!(converted_file_name(".hidden", OutputFormat::Bmp), ".hidden_converted.bmp");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&OutputFormat::WebP).unwrap(), "\"webp\"");
        let parsed: OutputFormat = serde_json::from_str("\"tiff\"").unwrap();
        assert_eq!(parsed, OutputFormat::Tiff);
    }

    #[test]
    fn test_only_jpeg_uses_quality() {
        let lossy: Vec<_> = OutputFormat::ALL.iter().filter(|f| f.uses_quality()).collect();
        assert_eq!(lossy, vec![&OutputFormat::Jpeg]);
    }
}
