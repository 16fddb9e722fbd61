//! Simulated product backend
//!
//! Stands in for the store's HTTP API: every call sleeps for a configured
//! latency, validates its input, and fails at a configured rate. The futures
//! it returns are `Send + 'static` so controllers can spawn them directly.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::millis;
use crate::error::NetworkError;
use crate::safe_text::is_valid_product_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    #[serde(rename = "cart_latency_ms", with = "millis")]
    pub cart_latency: Duration,
    #[serde(rename = "wishlist_latency_ms", with = "millis")]
    pub wishlist_latency: Duration,
    #[serde(rename = "quick_view_latency_ms", with = "millis")]
    pub quick_view_latency: Duration,
    /// Probability in `[0, 1]` that a call fails. Out-of-range values are
    /// clamped and NaN never fails.
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible failures.
    pub seed: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            cart_latency: Duration::from_millis(1500),
            wishlist_latency: Duration::from_millis(800),
            quick_view_latency: Duration::from_millis(300),
            failure_rate: 0.1,
            seed: None,
        }
    }
}

/// Cheap to clone; clones share the RNG and the cart.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    config: Arc<BackendConfig>,
    rng: Arc<Mutex<StdRng>>,
    cart_count: Arc<AtomicU32>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

impl SimulatedBackend {
    pub fn new(config: BackendConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config: Arc::new(config),
            rng: Arc::new(Mutex::new(rng)),
            cart_count: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn cart_count(&self) -> u32 {
        self.cart_count.load(Ordering::SeqCst)
    }

    /// Add one unit of `product_id` to the cart; resolves to the new item count.
    pub fn add_to_cart(
        &self,
        product_id: &str,
    ) -> impl Future<Output = Result<u32, NetworkError>> + Send + 'static {
        let this = self.clone();
        let product_id = product_id.to_owned();
        async move {
            tokio::time::sleep(this.config.cart_latency).await;
            this.check(&product_id)?;
            Ok(this.cart_count.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    /// Set wishlist membership; resolves to the membership the backend recorded.
    pub fn set_wishlisted(
        &self,
        product_id: &str,
        wishlisted: bool,
    ) -> impl Future<Output = Result<bool, NetworkError>> + Send + 'static {
        let this = self.clone();
        let product_id = product_id.to_owned();
        async move {
            tokio::time::sleep(this.config.wishlist_latency).await;
            this.check(&product_id)?;
            Ok(wishlisted)
        }
    }

    /// Load quick-view details for `product_id`.
    pub fn quick_view(
        &self,
        product_id: &str,
    ) -> impl Future<Output = Result<(), NetworkError>> + Send + 'static {
        let this = self.clone();
        let product_id = product_id.to_owned();
        async move {
            tokio::time::sleep(this.config.quick_view_latency).await;
            this.check(&product_id)
        }
    }

    fn check(&self, product_id: &str) -> Result<(), NetworkError> {
        if !is_valid_product_id(product_id) {
            return Err(NetworkError::InvalidRequest("invalid product id".into()));
        }
        if self.roll_failure() {
            return Err(NetworkError::Unavailable("network error occurred".into()));
        }
        Ok(())
    }

    fn roll_failure(&self) -> bool {
        let rate = self.config.failure_rate;
        if rate.is_nan() {
            return false;
        }
        let rate = rate.clamp(0.0, 1.0);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_bool(rate)
    }
}
