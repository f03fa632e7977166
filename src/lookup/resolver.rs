use tracing::{debug, warn};

use super::client::ProductLookup;
use super::thumbnail::{build_product_image, ProductImage};
use crate::error::Result;
use crate::state::data::Barcode;

/// How image resolution ended for one display unit
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Resolved(ProductImage),
    Unavailable,
}

/// Resolve the picture for one barcode.
///
/// Never fails: a short barcode, a failed or malformed lookup, a product
/// without image fields and a picture that can't be downloaded or decoded
/// all end as [`ImageOutcome::Unavailable`]. Short barcodes return before
/// any request is made.
pub async fn resolve_image<L: ProductLookup>(
    lookup: &L,
    barcode: &Barcode,
    thumbnail_size: u32,
) -> ImageOutcome {
    if !barcode.is_resolvable() {
        return ImageOutcome::Unavailable;
    }

    let url = match lookup.image_url(barcode).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            debug!("No image listed for {barcode}");
            return ImageOutcome::Unavailable;
        }
        Err(e) => {
            warn!("⚠️  Image lookup failed for {barcode}: {e}");
            return ImageOutcome::Unavailable;
        }
    };

    match load_image(lookup, url.clone(), thumbnail_size).await {
        Ok(image) => ImageOutcome::Resolved(image),
        Err(e) => {
            warn!("⚠️  Image for {barcode} failed to load from {url}: {e}");
            ImageOutcome::Unavailable
        }
    }
}

async fn load_image<L: ProductLookup>(lookup: &L, url: String, thumbnail_size: u32) -> Result<ProductImage> {
    let bytes = lookup.download(&url).await?;
    build_product_image(url, bytes, thumbnail_size).await
}
