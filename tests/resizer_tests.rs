use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

use resize_bot::config::ResizeConfig;
use resize_bot::content_type::ContentType;
use resize_bot::dimensions::Dimensions;
use resize_bot::errors::ResizeError;
use resize_bot::resizer::{resize_image, ImageResizer};

fn encoded(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("test image should encode");
    buf
}

fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 200, 180]));
    encoded(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 90]));
    encoded(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

#[test]
fn test_png_resize_keeps_format_and_alpha() {
    let output = resize_image(&gradient_png(40, 30), "image/png", Dimensions::new(20, 10)).unwrap();

    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&output).unwrap();
    assert_eq!(decoded.dimensions(), (20, 10));
    assert!(decoded.color().has_alpha());
}

#[test]
fn test_jpeg_resize_outputs_jpeg() {
    let output = resize_image(&gradient_jpeg(64, 48), "image/jpeg", Dimensions::new(128, 96)).unwrap();

    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (128, 96));
}

#[test]
fn test_png_input_declared_as_jpeg_is_reencoded_as_jpeg() {
    let output = resize_image(&gradient_png(16, 16), "image/jpeg", Dimensions::new(8, 8)).unwrap();
    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_same_size_resize_keeps_dimensions() {
    let input = gradient_png(33, 17);
    let once = resize_image(&input, "image/png", Dimensions::new(33, 17)).unwrap();
    let twice = resize_image(&once, "image/png", Dimensions::new(33, 17)).unwrap();

    assert_eq!(image::load_from_memory(&once).unwrap().dimensions(), (33, 17));
    assert_eq!(image::load_from_memory(&twice).unwrap().dimensions(), (33, 17));
}

#[test]
fn test_aspect_ratio_is_not_preserved() {
    let output = resize_image(&gradient_jpeg(100, 50), "image/jpeg", Dimensions::new(10, 40)).unwrap();
    assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (10, 40));
}

#[test]
fn test_unsupported_type_is_rejected_before_decode() {
    let result = resize_image(b"definitely not an image", "image/gif", Dimensions::new(8, 8));
    assert!(matches!(result, Err(ResizeError::UnsupportedType(ref t)) if t == "image/gif"));
}

#[test]
fn test_corrupt_input_is_a_decode_error() {
    let result = resize_image(b"definitely not an image", "image/png", Dimensions::new(8, 8));
    assert!(matches!(result, Err(ResizeError::Decode(_))));

    let mut truncated = gradient_png(32, 32);
    truncated.truncate(truncated.len() / 2);
    let result = resize_image(&truncated, "image/png", Dimensions::new(8, 8));
    assert!(result.is_err());
}

#[test]
fn test_oversized_target_is_rejected() {
    let resizer = ImageResizer::new(ResizeConfig {
        max_side: 100,
        ..ResizeConfig::default()
    });

    let result = resizer.resize(&gradient_png(4, 4), ContentType::Png, Dimensions::new(101, 5));
    match result {
        Err(ResizeError::TooLarge { requested, max_side }) => {
            assert_eq!(requested, Dimensions::new(101, 5));
            assert_eq!(max_side, 100);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }

    assert!(resizer
        .resize(&gradient_png(4, 4), ContentType::Png, Dimensions::new(100, 100))
        .is_ok());
}

#[test]
fn test_tall_narrow_target_on_wide_source_exceeds_pixel_budget() {
    let resizer = ImageResizer::new(ResizeConfig {
        max_pixels: 10_000,
        ..ResizeConfig::default()
    });

    // 10x200 is only 2000 target pixels, but the vertical pass needs 200x200
    let result = resizer.resize(&gradient_png(200, 200), ContentType::Png, Dimensions::new(10, 200));
    match result {
        Err(ResizeError::TooManyPixels {
            requested,
            pixels,
            max_pixels,
        }) => {
            assert_eq!(requested, Dimensions::new(10, 200));
            assert_eq!(pixels, 40_000);
            assert_eq!(max_pixels, 10_000);
        }
        other => panic!("expected TooManyPixels, got {other:?}"),
    }

    assert!(resizer
        .resize(&gradient_png(200, 200), ContentType::Png, Dimensions::new(200, 40))
        .is_ok());
}

#[test]
fn test_target_area_over_budget_is_rejected_before_decode() {
    let resizer = ImageResizer::new(ResizeConfig {
        max_pixels: 10_000,
        ..ResizeConfig::default()
    });

    let result = resizer.resize(b"definitely not an image", ContentType::Png, Dimensions::new(101, 100));
    assert!(matches!(result, Err(ResizeError::TooManyPixels { pixels: 10_100, .. })));
}

#[test]
fn test_compressible_large_png_is_refused_with_default_limits() {
    // A flat 5000x5000 PNG is a few hundred KB, the f32 working buffer is 400 MB
    let flat = encoded(DynamicImage::ImageLuma8(GrayImage::new(5000, 5000)), ImageFormat::Png);

    let result = resize_image(&flat, "image/png", Dimensions::new(10, 5000));
    assert!(matches!(
        result,
        Err(ResizeError::TooManyPixels {
            pixels: 25_000_000,
            ..
        })
    ));
}

#[test]
fn test_source_over_decode_limits_is_a_decode_error() {
    let resizer = ImageResizer::new(ResizeConfig {
        max_source_side: 100,
        ..ResizeConfig::default()
    });

    let result = resizer.resize(&gradient_png(200, 10), ContentType::Png, Dimensions::new(8, 8));
    assert!(matches!(result, Err(ResizeError::Decode(_))));
}

#[tokio::test]
async fn test_resize_blocking() {
    let resizer = ImageResizer::default();
    let output = resizer
        .resize_blocking(Arc::new(gradient_png(12, 12)), ContentType::Png, Dimensions::new(6, 3))
        .await
        .unwrap();

    assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (6, 3));
}
