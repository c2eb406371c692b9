use image::{DynamicImage, Rgba, RgbaImage};

/// Channel value above which a pixel counts as background
pub const DEFAULT_THRESHOLD: u8 = 240;

/// Background mask: red, green and blue all strictly above the threshold.
/// Alpha is ignored.
pub fn is_background(pixel: &Rgba<u8>, threshold: u8) -> bool {
    pixel[0] > threshold && pixel[1] > threshold && pixel[2] > threshold
}

/// Make the near-white background of an image transparent
///
/// The image is converted to RGBA first, so sources without an alpha channel
/// come out fully opaque. Every background pixel is replaced with
/// `(0, 0, 0, 0)`; all other pixels are kept as they are.
pub fn remove_white_background(image: &DynamicImage, threshold: u8) -> RgbaImage {
    let mut rgba = image.to_rgba8();

    for pixel in rgba.pixels_mut() {
        if is_background(pixel, threshold) {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    rgba
}
