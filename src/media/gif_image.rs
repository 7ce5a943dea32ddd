use std::io::Cursor;

use image::imageops::FilterType;
use thiserror::Error;

/// Errors returned when preparing image payloads.
#[derive(Debug, Error)]
pub enum GifImageError {
    /// The payload is empty.
    #[error("image payload cannot be empty")]
    EmptyPayload,
    /// The payload cannot be decoded as a GIF stream.
    #[error("invalid gif payload")]
    InvalidGif { source: gif::DecodingError },
    /// The source format is not recognised.
    #[error("unrecognised image format")]
    UnknownFormat(#[source] image::ImageError),
    /// The source image could not be decoded.
    #[error("failed to decode source image")]
    Decode(#[source] image::ImageError),
    /// Re-encoding as GIF failed.
    #[error("failed to encode image as gif")]
    Encode(#[source] image::ImageError),
}

/// Validated GIF bytes ready for an image command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GifImage {
    width: u16,
    height: u16,
    bytes: Vec<u8>,
}

impl GifImage {
    /// Converts any supported raster image to a single-frame GIF.
    ///
    /// GIF sources are kept byte for byte. When `fit` is given, other sources
    /// are scaled to fit inside `(width, height)` keeping their aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be recognised, decoded or
    /// re-encoded.
    pub fn from_image_bytes(source: &[u8], fit: Option<(u32, u32)>) -> Result<Self, GifImageError> {
        if source.is_empty() {
            return Err(GifImageError::EmptyPayload);
        }
        let format = image::guess_format(source).map_err(GifImageError::UnknownFormat)?;
        if format == image::ImageFormat::Gif {
            return Self::try_from(source);
        }

        let mut decoded = image::load_from_memory_with_format(source, format)
            .map_err(GifImageError::Decode)?;
        if let Some((width, height)) = fit {
            decoded = decoded.resize(width, height, FilterType::Lanczos3);
        }
        let mut encoded = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(decoded.to_rgba8())
            .write_to(&mut encoded, image::ImageFormat::Gif)
            .map_err(GifImageError::Encode)?;
        Self::try_from(encoded.into_inner())
    }

    /// Logical screen width declared by the GIF.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Logical screen height declared by the GIF.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(test)]
    pub(crate) fn from_encoded_unchecked(bytes: Vec<u8>) -> Self {
        Self {
            width: 0,
            height: 0,
            bytes,
        }
    }
}

impl TryFrom<Vec<u8>> for GifImage {
    type Error = GifImageError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            return Err(GifImageError::EmptyPayload);
        }
        let mut options = gif::DecodeOptions::new();
        options.check_frame_consistency(true);
        let reader = options
            .read_info(Cursor::new(bytes.as_slice()))
            .map_err(|source| GifImageError::InvalidGif { source })?;
        let (width, height) = (reader.width(), reader.height());
        drop(reader);
        Ok(Self {
            width,
            height,
            bytes,
        })
    }
}

impl TryFrom<&[u8]> for GifImage {
    type Error = GifImageError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use image::ImageEncoder;
    use pretty_assertions::assert_eq;

    use super::*;

    const MINIMAL_GIF_1X1: [u8; 43] = [
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
    ];

    #[test]
    fn try_from_reads_logical_dimensions() -> Result<(), GifImageError> {
        let gif = GifImage::try_from(MINIMAL_GIF_1X1.as_slice())?;
        assert_eq!((1, 1), (gif.width(), gif.height()));
        assert_eq!(MINIMAL_GIF_1X1.as_slice(), gif.as_bytes());
        Ok(())
    }

    #[test]
    fn try_from_rejects_empty_and_invalid_payloads() {
        assert_matches!(GifImage::try_from(Vec::new()), Err(GifImageError::EmptyPayload));
        assert_matches!(
            GifImage::try_from(vec![0x47, 0x49, 0x46]),
            Err(GifImageError::InvalidGif { .. })
        );
    }

    #[test]
    fn gif_sources_are_kept_verbatim() -> Result<(), GifImageError> {
        let gif = GifImage::from_image_bytes(&MINIMAL_GIF_1X1, Some((64, 16)))?;
        assert_eq!(MINIMAL_GIF_1X1.as_slice(), gif.as_bytes());
        Ok(())
    }

    #[test]
    fn png_sources_are_converted_and_fitted() -> Result<(), Box<dyn std::error::Error>> {
        let mut png_bytes = Vec::new();
        let source = image::RgbaImage::from_pixel(8, 2, image::Rgba([0xFF, 0x00, 0x00, 0xFF]));
        image::codecs::png::PngEncoder::new(&mut png_bytes).write_image(
            source.as_raw(),
            8,
            2,
            image::ExtendedColorType::Rgba8,
        )?;

        let gif = GifImage::from_image_bytes(&png_bytes, Some((4, 4)))?;
        assert_eq!((4, 1), (gif.width(), gif.height()));
        assert!(gif.as_bytes().starts_with(b"GIF8"));
        Ok(())
    }
}
