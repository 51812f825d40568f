use std::sync::Arc;

use common::{
    models::{
        ErrorResponse, GenerateNonceResponse, JWTResponse, PaymentResponse, PaymentTransaction,
        ResolvedSession,
    },
    requests::{GenerateNonceRequest, PaymentRequest, ResolveSessionRequest},
    WalletIdentity,
};
use reqwest::{Client, Response};
use reqwest_cookie_store::CookieStoreMutex;
use url::Url;

use crate::{errors::SdkErrors, sdk_builder::AuthSdkBuilder, wallet::WalletProvider};

/// Client for the authentication service. Session cookies set by the
/// service are kept in `cookie_store` and sent back automatically.
#[derive(Debug, Clone)]
pub struct AuthSdk {
    pub client: Client,
    pub base_url: Url,
    pub auth: Url,
    pub session: Url,
    pub logout: Url,
    pub payment: Url,
    pub cookie_store: Arc<CookieStoreMutex>,
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => error.error,
            Err(_) => format!("{status}: {body}"),
        },
        Err(e) => format!("{status}: {e}"),
    }
}

impl AuthSdk {
    pub fn new(url: Url) -> Result<Self, SdkErrors> {
        AuthSdkBuilder::new(url).build()
    }

    pub async fn request_nonce(
        &self,
        identity: &WalletIdentity,
    ) -> Result<GenerateNonceResponse, SdkErrors> {
        let response = self
            .client
            .get(self.auth.clone())
            .query(&GenerateNonceRequest {
                public_key: identity.public_key.to_string(),
                address: identity.address.clone(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SdkErrors::NonceRequestFailed(error_message(response).await));
        }
        Ok(response.json().await?)
    }

    pub async fn submit_signature(
        &self,
        nonce_token: &str,
        signature: &str,
    ) -> Result<JWTResponse, SdkErrors> {
        let response = self
            .client
            .post(self.auth.clone())
            .bearer_auth(nonce_token)
            .query(&[("signature", signature)])
            .send()
            .await?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            tracing::error!("{}", message);
            return Err(SdkErrors::SignatureRejected(message));
        }
        Ok(response.json().await?)
    }

    /// Runs the whole challenge: fetch a nonce token for the wallet's key,
    /// have the wallet sign it and exchange the signature for a session.
    pub async fn login<W: WalletProvider>(&self, wallet: &W) -> Result<JWTResponse, SdkErrors> {
        let family = wallet.family();
        if !family.signs_challenges() {
            return Err(SdkErrors::ChallengeUnsupported(family));
        }
        if !wallet.is_installed().await? {
            return Err(SdkErrors::NotInstalled(family));
        }
        let identity = wallet.get_public_key().await?;
        tracing::info!("Logging in {} with {}", identity.address, family);

        let nonce = self.request_nonce(&identity).await?;
        let signature = wallet.sign_message(&nonce.token).await?;
        let session = self.submit_signature(&nonce.token, &signature).await?;
        tracing::info!("Session established for {}", session.address);
        Ok(session)
    }

    /// Resolves `token`, or the stored session cookie when `token` is `None`.
    /// A missing or invalid session resolves to `None`.
    pub async fn resolve_session(&self, token: Option<&str>) -> Result<Option<String>, SdkErrors> {
        let response = self
            .client
            .post(self.session.clone())
            .json(&ResolveSessionRequest {
                token: token.map(str::to_string),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SdkErrors::SessionRequestFailed(error_message(response).await));
        }
        let resolved: ResolvedSession = response.json().await?;
        Ok(resolved.xrp_address)
    }

    /// Asks the service for an unsigned payment from the session's account.
    /// Without `session_token` the stored session cookie is used.
    pub async fn prepare_payment(
        &self,
        session_token: Option<&str>,
        request: &PaymentRequest,
    ) -> Result<PaymentTransaction, SdkErrors> {
        let mut builder = self.client.post(self.payment.clone()).json(request);
        if let Some(token) = session_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(SdkErrors::PaymentRequestFailed(error_message(response).await));
        }
        let payment: PaymentResponse = response.json().await?;
        Ok(payment.txjson)
    }

    /// Prepares a payment and passes it to `wallet` for signing and
    /// submission.
    pub async fn send_payment<W: WalletProvider>(
        &self,
        wallet: &W,
        session_token: Option<&str>,
        request: &PaymentRequest,
    ) -> Result<String, SdkErrors> {
        let txjson = self.prepare_payment(session_token, request).await?;
        Ok(wallet.send_payment(&txjson).await?)
    }

    pub async fn logout(&self) -> Result<(), SdkErrors> {
        let response = self.client.post(self.logout.clone()).send().await?;
        if !response.status().is_success() {
            return Err(SdkErrors::SessionRequestFailed(error_message(response).await));
        }
        Ok(())
    }

    /// Value of the cookie `name` currently stored for the service.
    pub fn stored_cookie(&self, name: &str) -> Option<String> {
        let store = self.cookie_store.lock().ok()?;
        store
            .get(self.base_url.host_str()?, "/", name)
            .map(|cookie| cookie.value().to_string())
    }
}
