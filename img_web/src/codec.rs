//! Image Codec capability
//!
//! The pipeline only talks to [`ImageCodec`]; decoding, resampling, colour
//! conversion and encoding all live behind it. [`StandardCodec`] is backed by
//! the `image` crate (decode, Lanczos3 resize, JPEG/PNG) and `webp` (lossy WebP
//! with quality control through libwebp).

use crate::config::OutputFormat;
use crate::error::CodecError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::borrow::Cow;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
    /// Indexed colour. `StandardCodec` never reports it: the `image` decoders
    /// expand palettes to RGB, or RGBA when the palette carries transparency.
    Palette,
}

impl ColorMode {
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::GrayAlpha | ColorMode::Rgba)
    }

    pub fn is_palette(self) -> bool {
        self == ColorMode::Palette
    }

    /// JPEG always gets plain RGB; WebP only when the source has alpha or a palette.
    pub fn needs_rgb_for(self, format: OutputFormat) -> bool {
        match format {
            OutputFormat::Jpeg => true,
            OutputFormat::Webp => self.has_alpha() || self.is_palette(),
            OutputFormat::Png => false,
        }
    }
}

pub trait ImageCodec {
    type Image;

    fn decode(&self, path: &Path) -> Result<Self::Image, CodecError>;

    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    fn color_mode(&self, image: &Self::Image) -> ColorMode;

    /// Resamples to exactly `width`x`height` with a high-quality filter.
    fn resize(&self, image: Self::Image, width: u32, height: u32) -> Result<Self::Image, CodecError>;

    /// Drops alpha/palette information, leaving three colour channels.
    fn to_rgb(&self, image: Self::Image) -> Self::Image;

    /// Writes `image` to `path`. `quality` is 1..=100; formats without a quality knob ignore it.
    fn encode(
        &self,
        image: &Self::Image,
        path: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> Result<(), CodecError>;
}

impl<C: ImageCodec + ?Sized> ImageCodec for &C {
    type Image = C::Image;

    fn decode(&self, path: &Path) -> Result<Self::Image, CodecError> {
        (**self).decode(path)
    }

    fn dimensions(&self, image: &Self::Image) -> (u32, u32) {
        (**self).dimensions(image)
    }

    fn color_mode(&self, image: &Self::Image) -> ColorMode {
        (**self).color_mode(image)
    }

    fn resize(&self, image: Self::Image, width: u32, height: u32) -> Result<Self::Image, CodecError> {
        (**self).resize(image, width, height)
    }

    fn to_rgb(&self, image: Self::Image) -> Self::Image {
        (**self).to_rgb(image)
    }

    fn encode(
        &self,
        image: &Self::Image,
        path: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> Result<(), CodecError> {
        (**self).encode(image, path, format, quality)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec;

impl StandardCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for StandardCodec {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| CodecError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        reader.decode().map_err(|source| CodecError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn dimensions(&self, image: &DynamicImage) -> (u32, u32) {
        image.dimensions()
    }

    fn color_mode(&self, image: &DynamicImage) -> ColorMode {
        use image::ColorType;

        match image.color() {
            ColorType::L8 | ColorType::L16 => ColorMode::Gray,
            ColorType::La8 | ColorType::La16 => ColorMode::GrayAlpha,
            c if c.has_alpha() => ColorMode::Rgba,
            _ => ColorMode::Rgb,
        }
    }

    fn resize(&self, image: DynamicImage, width: u32, height: u32) -> Result<DynamicImage, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::Resize { width, height });
        }
        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    fn to_rgb(&self, image: DynamicImage) -> DynamicImage {
        match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.into_rgb8()),
        }
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> Result<(), CodecError> {
        match format {
            OutputFormat::Jpeg => write_atomically(path, |writer| {
                let encoder = JpegEncoder::new_with_quality(writer, quality);
                image.write_with_encoder(encoder).map_err(|e| e.to_string())
            }),
            OutputFormat::Png => write_atomically(path, |writer| {
                let encoder =
                    PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilterType::Adaptive);
                image.write_with_encoder(encoder).map_err(|e| e.to_string())
            }),
            OutputFormat::Webp => {
                let bytes = encode_webp(image, path, quality)?;
                write_atomically(path, |writer| writer.write_all(&bytes).map_err(|e| e.to_string()))
            }
        }
    }
}

/// libwebp only accepts 8-bit RGB/RGBA buffers.
fn encode_webp(image: &DynamicImage, path: &Path, quality: u8) -> Result<Vec<u8>, CodecError> {
    let prepared: Cow<'_, DynamicImage> = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        other if other.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8())),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    };

    let encoder = webp::Encoder::from_image(&prepared).map_err(|reason| CodecError::Encode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })?;

    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| CodecError::Encode {
            path: path.to_path_buf(),
            reason: format!("libwebp error: {:?}", e),
        })?;

    Ok(memory.to_vec())
}

/// Writes through a temporary file in the destination directory and renames it
/// into place, so a failed encode never leaves a partial file behind.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), CodecError>
where
    F: FnOnce(&mut BufWriter<&mut std::fs::File>) -> Result<(), String>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let io_err = |source: std::io::Error| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".img-web-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(io_err)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer).map_err(|reason| CodecError::Encode {
            path: path.to_path_buf(),
            reason,
        })?;
        writer.flush().map_err(io_err)?;
    }

    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
