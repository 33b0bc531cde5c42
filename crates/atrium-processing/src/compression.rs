use anyhow::{anyhow, Result};
use bytes::Bytes;

/// Quality presets for WebP output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    #[default]
    Normal, // Default quality, balanced size and quality
    Better,   // Higher quality, ≈125% file size
    Best,     // Near pristine quality, ≈170% file size
    Lighter,  // Smaller files, ≈80% file size
    Lightest, // Maximum compression, ≈50% file size
}

impl QualityPreset {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(QualityPreset::Normal),
            "better" => Ok(QualityPreset::Better),
            "best" => Ok(QualityPreset::Best),
            "lighter" => Ok(QualityPreset::Lighter),
            "lightest" => Ok(QualityPreset::Lightest),
            _ => Err(anyhow!("Invalid quality preset: {}", s)),
        }
    }

    /// Get quality value for WebP (0-100)
    pub fn webp_quality(self) -> f32 {
        match self {
            QualityPreset::Normal => 80.0,
            QualityPreset::Better => 90.0,
            QualityPreset::Best => 98.0,
            QualityPreset::Lighter => 70.0,
            QualityPreset::Lightest => 55.0,
        }
    }
}

/// Decode any supported raster image and encode it as lossy WebP.
///
/// CPU bound; callers on the async runtime should run it on the blocking pool.
pub fn encode_webp(data: &[u8], quality: QualityPreset) -> Result<Bytes> {
    let img = image::load_from_memory(data).map_err(|e| anyhow!("decode failed: {}", e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let encoded = webp::Encoder::from_rgba(&rgba, width, height)
        .encode_simple(false, quality.webp_quality())
        .map_err(|e| anyhow!("WebP encoding failed: {:?}", e))?;

    Ok(Bytes::copy_from_slice(&encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_fixture() -> Vec<u8> {
        let img = RgbaImage::from_pixel(16, 16, Rgba([200, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_quality_preset_parse() {
        assert_eq!(QualityPreset::parse("normal").unwrap(), QualityPreset::Normal);
        assert_eq!(QualityPreset::parse("BEST").unwrap(), QualityPreset::Best);
        assert_eq!(QualityPreset::parse("lightest").unwrap(), QualityPreset::Lightest);
        assert!(QualityPreset::parse("ultra").is_err());
    }

    #[test]
    fn test_webp_quality_values() {
        assert_eq!(QualityPreset::default().webp_quality(), 80.0);
        assert_eq!(QualityPreset::Better.webp_quality(), 90.0);
        assert_eq!(QualityPreset::Best.webp_quality(), 98.0);
        assert_eq!(QualityPreset::Lighter.webp_quality(), 70.0);
        assert_eq!(QualityPreset::Lightest.webp_quality(), 55.0);
    }

    #[test]
    fn test_encode_webp_produces_riff_container() {
        let png = png_fixture();
        let webp = encode_webp(&png, QualityPreset::Normal).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
        assert_ne!(webp.as_ref(), png.as_slice());
    }

    #[test]
    fn test_encode_webp_rejects_garbage() {
        assert!(encode_webp(b"definitely not an image", QualityPreset::Normal).is_err());
    }
}
