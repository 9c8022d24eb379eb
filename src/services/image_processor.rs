// src/services/image_processor.rs
use crate::errors::ToneError;
use base64::{Engine as _, engine::general_purpose};
use image::io::Reader;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

const MAX_DIMENSION: u32 = 4096;

/// An upload whose format and dimensions have been checked from the header
/// only. No raster is allocated.
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

/// A decoded upload. `encoded` keeps the original bytes for the face
/// locator; `pixels` is the raster the sampler reads.
pub struct SourceImage {
    pub encoded: EncodedImage,
    pub pixels: RgbaImage,
}

impl SourceImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Accepts `data:<mime>;base64,<payload>` or a bare base64 payload.
    pub fn decode_data_url(&self, input: &str) -> Result<Vec<u8>, ToneError> {
        let trimmed = input.trim();
        let payload = match trimmed.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    ToneError::InvalidImage("Malformed data URL".to_string())
                })?;
                if !header.ends_with(";base64") {
                    return Err(ToneError::InvalidImage(
                        "Data URL must be base64 encoded".to_string(),
                    ));
                }
                payload
            }
            None => trimmed,
        };

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ToneError::InvalidImage(format!("Invalid base64 payload: {}", e)))
    }

    /// Checks format and dimensions from the image header without decoding pixels.
    pub fn validate_image(&self, data: Vec<u8>) -> Result<EncodedImage, ToneError> {
        let format = image::guess_format(&data)
            .map_err(|e| ToneError::InvalidImage(format!("Unrecognized image format: {}", e)))?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(ToneError::InvalidImage(format!(
                "Unsupported image format: {:?}",
                format
            )));
        }

        let (width, height) = Reader::with_format(Cursor::new(&data), format)
            .into_dimensions()
            .map_err(|e| ToneError::InvalidImage(format!("Invalid image format: {}", e)))?;

        if width == 0 || height == 0 {
            return Err(ToneError::InvalidImage("Image has no pixels".to_string()));
        }

        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ToneError::InvalidImage(format!(
                "Image dimensions exceed {}x{}",
                MAX_DIMENSION, MAX_DIMENSION
            )));
        }

        Ok(EncodedImage {
            bytes: data,
            format,
            width,
            height,
        })
    }

    pub fn decode(&self, encoded: EncodedImage) -> Result<SourceImage, ToneError> {
        let pixels = Reader::with_format(Cursor::new(&encoded.bytes), encoded.format)
            .decode()
            .map_err(|e| ToneError::InvalidImage(format!("Failed to decode image: {}", e)))?
            .to_rgba8();

        Ok(SourceImage { encoded, pixels })
    }

    pub fn load(&self, data: Vec<u8>) -> Result<SourceImage, ToneError> {
        let encoded = self.validate_image(data)?;
        self.decode(encoded)
    }

    pub fn load_data_url(&self, input: &str) -> Result<SourceImage, ToneError> {
        let data = self.decode_data_url(input)?;
        self.load(data)
    }

    /// Header-checked bytes for storage; the raster is never built.
    pub fn validate_data_url(&self, input: &str) -> Result<EncodedImage, ToneError> {
        let data = self.decode_data_url(input)?;
        self.validate_image(data)
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}
