//! QR image rendering for issued tags.
//!
//! Issued tags encode a fixed-pattern registration URL. The rendered image is
//! returned to the admin UI as a base64 `data:` URL so it can be displayed
//! and printed without a second round trip.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

use crate::errors::Error;

/// Render `url` as a QR code and return it as a PNG data URL.
pub fn render_data_url(url: &str) -> Result<String, Error> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| Error::Internal {
        operation: format!("build QR matrix: {e}"),
    })?;

    let image = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| Error::Internal {
            operation: format!("encode QR PNG: {e}"),
        })?;

    Ok(format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_png_data_url() {
        let data_url = render_data_url("https://tags.example.com/registro?codigo=abc-123").unwrap();

        let payload = data_url.strip_prefix("data:image/png;base64,").expect("data URL prefix");
        let bytes = general_purpose::STANDARD.decode(payload).unwrap();

        // PNG magic number
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_different_urls_render_differently() {
        let a = render_data_url("https://tags.example.com/registro?codigo=aaa").unwrap();
        let b = render_data_url("https://tags.example.com/registro?codigo=bbb").unwrap();
        assert_ne!(a, b);
    }
}
