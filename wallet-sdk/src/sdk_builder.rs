use std::sync::Arc;

use reqwest::Client;
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use url::Url;

use crate::{errors::SdkErrors, sdk::AuthSdk};

#[derive(Debug)]
pub struct AuthSdkBuilder {
    base_url: Url,
    cookie_store: Option<Arc<CookieStoreMutex>>,
}

impl AuthSdkBuilder {
    pub fn new(base_url: Url) -> Self {
        AuthSdkBuilder {
            base_url,
            cookie_store: None,
        }
    }

    /// Shares an existing cookie jar, e.g. to resume a stored session.
    pub fn cookie_store(mut self, cookie_store: Arc<CookieStoreMutex>) -> Self {
        self.cookie_store = Some(cookie_store);
        self
    }

    pub fn build(self) -> Result<AuthSdk, SdkErrors> {
        let cookie_store = self
            .cookie_store
            .unwrap_or_else(|| Arc::new(CookieStoreMutex::new(CookieStore::default())));
        let client = Client::builder()
            .cookie_provider(cookie_store.clone())
            .build()?;
        Ok(AuthSdk {
            client,
            auth: self.base_url.join("auth")?,
            session: self.base_url.join("session")?,
            logout: self.base_url.join("logout")?,
            payment: self.base_url.join("payment")?,
            base_url: self.base_url,
            cookie_store,
        })
    }
}
