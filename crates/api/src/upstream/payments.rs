//! Payment-provider REST client (checkout session creation).

use std::time::Duration;

use lingua_core::economy::CoinPack;
use lingua_core::types::DbId;
use serde::Deserialize;

use super::UpstreamError;
use crate::config::PaymentConfig;

/// A created checkout session: the id is later echoed back by the webhook
/// as the purchase's external reference.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Client for the payment provider's HTTP API.
pub struct PaymentsClient {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
    public_base_url: String,
}

impl PaymentsClient {
    /// Build a client with a pre-configured timeout.
    pub fn new(config: &PaymentConfig, public_base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.clone(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a checkout session for a coin pack.
    ///
    /// The profile id and coin amount ride in the session metadata so the
    /// completion webhook can credit the right account.
    pub async fn create_checkout_session(
        &self,
        profile_id: DbId,
        pack: &CoinPack,
    ) -> Result<CheckoutSession, UpstreamError> {
        let success_url = format!(
            "{}/coins/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.public_base_url
        );
        let cancel_url = format!("{}/coins/checkout/cancelled", self.public_base_url);
        let product_name = format!("{} coins", pack.coins);

        let params: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                pack.currency.to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                pack.amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                product_name,
            ),
            ("metadata[profile_id]", profile_id.to_string()),
            ("metadata[coins]", pack.coins.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;
        Ok(session)
    }
}
