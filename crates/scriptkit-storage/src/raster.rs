//! Decoded raster images.

use crate::StorageResult;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::Cursor;

/// Edge length of the generated placeholder image.
pub const PLACEHOLDER_SIZE: u32 = 100;

const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 0, 255];

/// A decoded image.
///
/// Serializes as a base64 PNG string so it can travel inside JSON documents.
#[derive(Clone, PartialEq)]
pub struct Image {
    inner: DynamicImage,
}

impl Image {
    /// Decode an image from encoded bytes (PNG, JPEG, GIF).
    pub fn from_bytes(bytes: &[u8]) -> StorageResult<Self> {
        Ok(Self {
            inner: image::load_from_memory(bytes)?,
        })
    }

    pub fn from_dynamic(inner: DynamicImage) -> Self {
        Self { inner }
    }

    /// Image of `width`×`height` filled with one RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            inner: DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba))),
        }
    }

    /// The fallback image: 100×100 solid red.
    pub fn placeholder() -> Self {
        Self::solid(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_COLOR)
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// RGBA value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.inner.get_pixel(x, y).0
    }

    /// Copy of the region starting at `(x, y)`, clamped to the image bounds.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            inner: self.inner.crop_imm(x, y, width, height),
        }
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> StorageResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.inner.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Serialize for Image {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let png = self.to_png().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&BASE64.encode(png))
    }
}

impl<'de> Deserialize<'de> for Image {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64.decode(encoded.as_bytes()).map_err(de::Error::custom)?;
        Image::from_bytes(&bytes).map_err(de::Error::custom)
    }
}
