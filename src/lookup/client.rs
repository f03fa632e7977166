use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, warn};

use crate::config::{Settings, BARCODE_PLACEHOLDER};
use crate::error::Result;
use crate::state::data::Barcode;

/// The external product service, reduced to what image resolution needs.
pub trait ProductLookup: Send + Sync + 'static {
    /// Best image URL for a product, or `None` when the product has no picture.
    fn image_url(&self, barcode: &Barcode) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Download the bytes behind an image URL.
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Product JSON as returned by the lookup endpoint
///
/// Only the image fields are modelled; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub product: Option<ProductImages>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductImages {
    #[serde(default)]
    pub image_front_small_url: Option<String>,
    #[serde(default)]
    pub image_front_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductResponse {
    /// First non-empty URL in order: small front, full front, generic.
    pub fn preferred_image_url(&self) -> Option<String> {
        let product = self.product.as_ref()?;

        [
            &product.image_front_small_url,
            &product.image_front_url,
            &product.image_url,
        ]
        .into_iter()
        .flatten()
        .map(|url| url.trim())
        .find(|url| !url.is_empty())
        .map(str::to_string)
    }
}

/// HTTP client for the Open Food Facts product API
#[derive(Debug, Clone)]
pub struct OpenFoodFacts {
    client: Client,
    endpoint: String,
}

impl OpenFoodFacts {
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to a default HTTP client: {e}");
                Client::new()
            });

        Self {
            client,
            endpoint: settings.lookup_endpoint.clone(),
        }
    }

    /// Product URL for a barcode
    pub fn product_url(&self, barcode: &Barcode) -> String {
        self.endpoint.replace(BARCODE_PLACEHOLDER, barcode.as_str())
    }
}

impl ProductLookup for OpenFoodFacts {
    async fn image_url(&self, barcode: &Barcode) -> Result<Option<String>> {
        let url = self.product_url(barcode);
        debug!("Looking up product image at {url}");

        let response: ProductResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.preferred_image_url())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProductResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_small_front_image_wins() {
        let response = parse(
            r#"{
                "code": "3017620422003",
                "product": {
                    "image_front_small_url": "A",
                    "image_front_url": "B",
                    "image_url": "C"
                },
                "status": 1
            }"#,
        );

        assert_eq!(response.preferred_image_url().as_deref(), Some("A"));
    }

    #[test]
    fn test_falls_through_missing_and_empty_fields() {
        let response = parse(r#"{ "product": { "image_front_small_url": "", "image_url": "C" } }"#);

        assert_eq!(response.preferred_image_url().as_deref(), Some("C"));
    }

    #[test]
    fn test_null_fields_are_absent() {
        let response = parse(r#"{ "product": { "image_front_small_url": null, "image_front_url": "B" } }"#);

        assert_eq!(response.preferred_image_url().as_deref(), Some("B"));
    }

    #[test]
    fn test_unknown_product_has_no_image() {
        let response = parse(r#"{ "code": "12345678", "status": 0, "status_verbose": "product not found" }"#);

        assert_eq!(response.preferred_image_url(), None);
    }

    #[test]
    fn test_product_without_image_fields() {
        let response = parse(r#"{ "product": { "product_name": "Nutella" } }"#);

        assert_eq!(response.preferred_image_url(), None);
    }

    #[test]
    fn test_product_url_uses_endpoint_template() {
        let lookup = OpenFoodFacts::new(&Settings::default());

        assert_eq!(
            lookup.product_url(&Barcode::normalize("3017620422003")),
            "https://world.openfoodfacts.org/api/v0/product/3017620422003.json"
        );
    }
}
