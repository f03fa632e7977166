/// Product image lookup module
///
/// This module handles:
/// - Querying the product service for an image URL (client.rs)
/// - Downloading and shrinking the picture (thumbnail.rs)
/// - Turning every failure into a placeholder (resolver.rs)

pub mod client;
pub mod resolver;
pub mod thumbnail;

pub use client::OpenFoodFacts;
pub use resolver::{resolve_image, ImageOutcome};
pub use thumbnail::ProductImage;
