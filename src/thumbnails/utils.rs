use crate::errors::{DecodeError, GalleryResult};
use image::{imageops::FilterType, DynamicImage, ImageOutputFormat, RgbImage};
use std::io::Cursor;

/// Shrink `image` to fit within `max_width` x `max_height`, keeping its
/// aspect ratio. Smaller images are returned unchanged.
pub fn resize_image(image: RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (width, height) = image.dimensions();

    if width <= max_width && height <= max_height {
        return image;
    }

    let ratio = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    image::imageops::resize(&image, new_width, new_height, FilterType::Lanczos3)
}

/// Encode an RGB image as baseline JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> GalleryResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut cursor, ImageOutputFormat::Jpeg(quality))
        .map_err(|e| DecodeError::new(format!("JPEG encoding failed: {}", e)))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let image = RgbImage::from_pixel(1920, 1080, Rgb([10, 20, 30]));
        let resized = resize_image(image, 640, 640);
        assert_eq!(resized.dimensions(), (640, 360));
    }

    #[test]
    fn test_resize_never_upscales() {
        let image = RgbImage::from_pixel(320, 180, Rgb([0, 0, 0]));
        assert_eq!(resize_image(image, 1280, 720).dimensions(), (320, 180));
    }

    #[test]
    fn test_encoded_jpeg_decodes() {
        let image = RgbImage::from_pixel(64, 48, Rgb([200, 100, 50]));
        let jpeg = encode_jpeg(&image, 85).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), image::ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
