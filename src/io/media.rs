// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Source image loading.
//!
//! Decodes a bitmap into a premultiplied pixmap for painting and keeps the
//! original encoded bytes so the host can hand them on unchanged. Decoding
//! can run on a background thread; the result comes back over a channel
//! tagged with the load token it was started for.

use crate::error::{EditorError, Result};
use crate::util::generation::Token;
use image::error::{LimitError, LimitErrorKind};
use image::{ImageError, ImageFormat};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use tiny_skia::{ColorU8, IntSize, Pixmap};

/// A decoded source bitmap. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixmap: Pixmap,
    bytes: Vec<u8>,
    format: Option<ImageFormat>,
}

/// Message sent back by [`spawn_decode`].
pub type DecodeResult = (Token, Result<SourceImage>);

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Size in pixels as a scene-space vector.
    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.width() as f32, self.height() as f32)
    }

    /// Premultiplied RGBA pixels.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// The bytes the image was decoded from.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}

fn empty_image() -> EditorError {
    EditorError::Decode(ImageError::Limits(LimitError::from_kind(
        LimitErrorKind::DimensionError,
    )))
}

/// Decode an encoded bitmap (PNG, JPEG, ...).
pub fn decode_image(bytes: Vec<u8>) -> Result<SourceImage> {
    let format = image::guess_format(&bytes).ok();
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let size = IntSize::from_wh(width, height).ok_or_else(empty_image)?;

    let mut data = Vec::with_capacity(rgba.as_raw().len());
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let premultiplied = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[
            premultiplied.red(),
            premultiplied.green(),
            premultiplied.blue(),
            premultiplied.alpha(),
        ]);
    }
    let pixmap = Pixmap::from_vec(data, size).ok_or_else(empty_image)?;

    Ok(SourceImage {
        pixmap,
        bytes,
        format,
    })
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<SourceImage> {
    let bytes = std::fs::read(path)?;
    let image = decode_image(bytes)?;
    log::info!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.format()
    );
    Ok(image)
}

/// Decode `path` on a background thread.
pub fn spawn_decode(path: PathBuf, token: Token) -> Receiver<DecodeResult> {
    let (sender, receiver) = channel();
    std::thread::spawn(move || {
        let result = load_image(&path);
        if let Err(e) = &result {
            log::error!("Failed to load {}: {}", path.display(), e);
        }
        let _ = sender.send((token, result));
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_decode_premultiplies_and_keeps_bytes() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(0, 0, Rgba([200, 100, 0, 128]));
        let bytes = encode_png(&source);
        let image = decode_image(bytes.clone()).unwrap();

        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.format(), Some(ImageFormat::Png));
        assert_eq!(image.bytes(), bytes.as_slice());
        let pixel = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!(pixel.alpha(), 128);
        assert_eq!(pixel.red(), 100);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image(vec![1, 2, 3, 4]),
            Err(EditorError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_image(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }
}
