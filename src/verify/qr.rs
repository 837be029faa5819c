use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::core::FiskalError;

/// Error correction used for receipt QR codes.
pub const QR_ERROR_CORRECTION: EcLevel = EcLevel::H;

/// Minimum edge length of the rendered QR image, in pixels.
pub const QR_MIN_DIMENSION: u32 = 256;

/// Encode `payload` as a PNG QR code at the highest error-correction level.
pub fn encode_qr_png(payload: &str) -> Result<Vec<u8>, FiskalError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), QR_ERROR_CORRECTION)
        .map_err(|e| FiskalError::Encoding(format!("QR code: {e}")))?;
    let pixels = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build();

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(pixels)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| FiskalError::Encoding(format!("PNG: {e}")))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_png() {
        let png = encode_qr_png("https://efitest.tax.gov.me/ic/#/verify?iic=ABC").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let img = image::load_from_memory(&png).unwrap();
        assert!(img.to_luma8().width() >= QR_MIN_DIMENSION);
    }

    #[test]
    fn oversized_payload_fails() {
        let payload = "x".repeat(4000);
        assert!(matches!(
            encode_qr_png(&payload),
            Err(FiskalError::Encoding(_))
        ));
    }
}
