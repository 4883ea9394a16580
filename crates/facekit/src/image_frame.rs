//! Image buffers handed across the engine boundary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Pixel layout of an [`ImageFrame`], with the engine's numeric tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum ImageFormat {
    /// BGR888, interleaved.
    Bgr24 = 1,
    /// RGB888, interleaved.
    Rgb24 = 2,
    /// Grayscale, one byte per pixel.
    Gray = 3,
    /// BGRA, one byte per channel, alpha ignored.
    Bgra = 4,
    /// RGBA, one byte per channel, alpha ignored.
    Rgba = 5,
    /// Biplanar Y plane followed by interleaved UV.
    Nv12 = 6,
    /// Biplanar Y plane followed by interleaved VU.
    Nv21 = 7,
}

impl ImageFormat {
    /// Required buffer length for a `width` x `height` frame.
    pub fn buffer_len(self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            ImageFormat::Bgr24 | ImageFormat::Rgb24 => pixels * 3,
            ImageFormat::Gray => pixels,
            ImageFormat::Bgra | ImageFormat::Rgba => pixels * 4,
            ImageFormat::Nv12 | ImageFormat::Nv21 => pixels * 3 / 2,
        }
    }

    fn is_biplanar(self) -> bool {
        matches!(self, ImageFormat::Nv12 | ImageFormat::Nv21)
    }
}

/// An owned image buffer validated against its declared format.
///
/// Construction is the only place buffer geometry is checked; once an
/// `ImageFrame` exists it can cross the FFI boundary as-is.
#[derive(Clone)]
pub struct ImageFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: ImageFormat,
}

impl ImageFrame {
    /// Wrap a pixel buffer, verifying its length against the format.
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: ImageFormat,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage);
        }
        // Chroma subsampling needs even dimensions.
        if format.is_biplanar() && (width % 2 != 0 || height % 2 != 0) {
            return Err(Error::InvalidImage);
        }
        let expected = format.buffer_len(width, height);
        if data.len() != expected {
            return Err(Error::InvalidImage);
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Decode an image file into an RGB24 frame.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let decoded = image::open(path.as_ref()).map_err(|err| {
            tracing::warn!(path = %path.as_ref().display(), error = %err, "image decode failed");
            Error::InvalidImage
        })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::new(rgb.into_raw(), width, height, ImageFormat::Rgb24)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Native descriptor borrowing this frame's buffer. The C signature
    /// takes a mutable pointer but the engine only reads through it and
    /// never frees it, so handing out a const buffer is sound.
    pub(crate) fn as_image_data(&self) -> facekit_sys::ImageData {
        facekit_sys::ImageData {
            format: self.format as u32,
            width: self.width as i32,
            height: self.height as i32,
            data: self.data.as_ptr() as *mut u8,
        }
    }
}

impl std::fmt::Debug for ImageFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_len_per_format() {
        assert_eq!(ImageFormat::Rgb24.buffer_len(4, 2), 24);
        assert_eq!(ImageFormat::Bgr24.buffer_len(4, 2), 24);
        assert_eq!(ImageFormat::Gray.buffer_len(4, 2), 8);
        assert_eq!(ImageFormat::Rgba.buffer_len(4, 2), 32);
        assert_eq!(ImageFormat::Nv12.buffer_len(4, 2), 12);
        assert_eq!(ImageFormat::Nv21.buffer_len(4, 2), 12);
    }

    #[test]
    fn test_new_accepts_exact_buffer() {
        let frame = ImageFrame::new(vec![0u8; 24], 4, 2, ImageFormat::Rgb24).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.format(), ImageFormat::Rgb24);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = ImageFrame::new(vec![0u8; 23], 4, 2, ImageFormat::Rgb24);
        assert!(matches!(result, Err(Error::InvalidImage)));
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let result = ImageFrame::new(vec![], 0, 2, ImageFormat::Gray);
        assert!(matches!(result, Err(Error::InvalidImage)));
    }

    #[test]
    fn test_new_rejects_odd_nv12() {
        // 3x2 NV12 has no whole chroma plane
        let result = ImageFrame::new(vec![0u8; 9], 3, 2, ImageFormat::Nv12);
        assert!(matches!(result, Err(Error::InvalidImage)));
    }

    #[test]
    fn test_native_descriptor_mirrors_frame() {
        let frame = ImageFrame::new(vec![7u8; 8], 4, 2, ImageFormat::Gray).unwrap();
        let raw = frame.as_image_data();
        assert_eq!(raw.format, 3);
        assert_eq!(raw.width, 4);
        assert_eq!(raw.height, 2);
        assert!(!raw.data.is_null());
    }
}
