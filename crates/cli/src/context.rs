//! Shared state for one CLI invocation.

use std::sync::Arc;

use tracing::debug;

use shophub_storefront::api::ApiClient;
use shophub_storefront::cart::{CartStore, Subscription};
use shophub_storefront::config::StorefrontConfig;
use shophub_storefront::session::SessionStore;
use shophub_storefront::storage::FileStorage;

/// Cart, session and API client over one data directory.
///
/// Cart and session share a single [`FileStorage`], so both survive between
/// invocations.
pub struct Context {
    pub config: StorefrontConfig,
    pub cart: CartStore<Arc<FileStorage>>,
    pub session: Arc<SessionStore<Arc<FileStorage>>>,
    pub client: ApiClient,
    _cart_watch: Subscription,
}

impl Context {
    pub fn new(config: StorefrontConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
        let client = ApiClient::new(&config.api, session.clone());
        let cart = CartStore::new(storage);
        let cart_watch = cart.subscribe(|| debug!("cart changed"));

        debug!(data_dir = %config.data_dir.display(), api = %config.api.base_url, "context ready");

        Self {
            config,
            cart,
            session,
            client,
            _cart_watch: cart_watch,
        }
    }
}
