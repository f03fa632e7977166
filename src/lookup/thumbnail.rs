use iced::widget::image::Handle;
use image::imageops::FilterType;

use crate::error::Result;

/// A product picture ready to display
#[derive(Debug, Clone)]
pub struct ProductImage {
    /// Where the picture was downloaded from
    pub url: String,
    /// RGBA pixels uploaded by the image widget
    pub handle: Handle,
}

/// Decoded RGBA pixels that fit inside a square bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode image bytes and shrink them to fit `max_size` x `max_size`.
///
/// Images already inside the box are kept at their size. Bytes that aren't
/// a decodable image are an error, which is how a broken link shows up.
pub fn decode_thumbnail(bytes: &[u8], max_size: u32) -> Result<Thumbnail> {
    let img = image::load_from_memory(bytes)?;

    let img = if img.width() > max_size || img.height() > max_size {
        img.resize(max_size, max_size, FilterType::Triangle)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Decode a downloaded picture on a blocking worker and wrap it for display.
pub async fn build_product_image(url: String, bytes: Vec<u8>, max_size: u32) -> Result<ProductImage> {
    // Decoding a full-size JPEG is CPU-bound
    let thumbnail = tokio::task::spawn_blocking(move || decode_thumbnail(&bytes, max_size)).await??;

    Ok(ProductImage {
        url,
        handle: Handle::from_rgba(thumbnail.width, thumbnail.height, thumbnail.rgba),
    })
}
