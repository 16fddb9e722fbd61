//! Card configuration, loadable from a JSON file
//!
//! ```json
//! {
//!   "product": { "id": "sku123", "name": "Wireless Headphones", "price": "79.99" },
//!   "add_to_cart": { "debounce_ms": 300, "success_display_ms": 2000 },
//!   "backend": { "failure_rate": 0.25, "seed": 42 }
//! }
//! ```
//!
//! Missing sections fall back to the defaults.

use std::path::Path;
use std::time::Duration;

use card_dispatch::config::millis;
use card_dispatch::safe_text::is_valid_product_id;
use card_dispatch::{BackendConfig, ConfigError, ControllerConfig};
use serde::{Deserialize, Serialize};

use crate::state::Product;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub id: String,
    pub name: String,
    /// Kept as text; unparseable prices show as 0.00
    pub price: String,
    /// Image location; `None` makes the image fail to load
    pub image: Option<String>,
    pub image_alt: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            id: "sku123".into(),
            name: "Wireless Headphones".into(),
            price: "79.99".into(),
            image: Some("headphones.jpg".into()),
            image_alt: "Wireless headphones in matte black".into(),
        }
    }
}

impl ProductConfig {
    pub fn product(&self) -> Product {
        Product::new(&self.id, &self.name, &self.price, &self.image_alt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub product: ProductConfig,
    pub add_to_cart: ControllerConfig,
    pub wishlist: ControllerConfig,
    pub quick_view: ControllerConfig,
    pub backend: BackendConfig,
    /// Simulated image load time
    #[serde(rename = "image_delay_ms", with = "millis")]
    pub image_delay: Duration,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            product: ProductConfig::default(),
            add_to_cart: ControllerConfig::add_to_cart(),
            wishlist: ControllerConfig::wishlist(),
            quick_view: ControllerConfig::quick_view(),
            backend: BackendConfig::default(),
            image_delay: Duration::from_millis(600),
        }
    }
}

impl CardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_product_id(&self.product.id) {
            return Err(ConfigError::Invalid(format!(
                "product id {:?} must be 1-50 letters, digits, '-' or '_'",
                self.product.id
            )));
        }
        if !(0.0..=1.0).contains(&self.backend.failure_rate) {
            return Err(ConfigError::Invalid(
                "backend.failure_rate must be between 0 and 1".into(),
            ));
        }
        self.add_to_cart.validate()?;
        self.wishlist.validate()?;
        self.quick_view.validate()
    }
}
