use super::requests::{
    ChoiceAllRequest, ChoiceBody, ConsentStatusRequest, MessagesRequest, MetaDataRequest,
    PvDataBody,
};
use super::responses::{
    ChoiceAllResponse, ConsentResponse, ConsentStatusResponse, MessagesResponse, MetaDataResponse,
};
use super::ConsentApi;
use crate::action::ActionType;
use crate::config::CampaignEnv;
use crate::consent::CampaignType;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://cdn.privacy-mgmt.com";

pub fn build_api_client() -> Client {
    build_api_client_with_timeout(30)
}

pub fn build_api_client_with_timeout(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// `ConsentApi` over the wrapper HTTP endpoints.
pub struct HttpConsentApi {
    client: Client,
    base_url: String,
    env: &'static str,
    /// Correlates all requests issued by one client instance.
    request_uuid: Uuid,
}

impl HttpConsentApi {
    pub fn new(env: CampaignEnv) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, env)
    }

    pub fn with_base_url(base_url: &str, env: CampaignEnv) -> Self {
        Self {
            client: build_api_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            env: match env {
                CampaignEnv::Prod => "prod",
                CampaignEnv::Stage => "stage",
            },
            request_uuid: Uuid::new_v4(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/wrapper/v2/{path}", self.base_url)
    }

    fn metadata_query<T: Serialize>(metadata: &T) -> Result<String, ClientError> {
        serde_json::to_string(metadata).map_err(|e| ClientError::Decoding(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self
            .client
            .get(url)
            .query(&[("env", self.env)])
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&e))?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .client
            .post(url)
            .query(&[("env", self.env)])
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&e))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Transport(format!(
                "http {status}: {}",
                body.chars().take(256).collect::<String>()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decoding(e.to_string()))
    }
}

#[async_trait]
impl ConsentApi for HttpConsentApi {
    async fn meta_data(
        &self,
        account_id: u32,
        property_id: u32,
        request: &MetaDataRequest,
    ) -> Result<MetaDataResponse, ClientError> {
        self.get_json(
            &self.url("meta-data"),
            &[
                ("accountId", account_id.to_string()),
                ("propertyId", property_id.to_string()),
                ("metadata", Self::metadata_query(request)?),
            ],
        )
        .await
    }

    async fn consent_status(
        &self,
        property_id: u32,
        request: &ConsentStatusRequest,
        auth_id: Option<&str>,
    ) -> Result<ConsentStatusResponse, ClientError> {
        let mut query = vec![
            ("propertyId", property_id.to_string()),
            ("metadata", Self::metadata_query(request)?),
            ("withSiteActions", "false".to_string()),
        ];
        if let Some(auth_id) = auth_id {
            query.push(("authId", auth_id.to_string()));
        }
        self.get_json(&self.url("consent-status"), &query).await
    }

    async fn messages(&self, request: &MessagesRequest) -> Result<MessagesResponse, ClientError> {
        self.post_json(&self.url("v2/messages"), request).await
    }

    async fn choice_all(
        &self,
        action_type: ActionType,
        account_id: u32,
        property_id: u32,
        request: &ChoiceAllRequest,
    ) -> Result<ChoiceAllResponse, ClientError> {
        let path = format!("choice/{}", action_type.endpoint_segment());
        self.get_json(
            &self.url(&path),
            &[
                ("accountId", account_id.to_string()),
                ("propertyId", property_id.to_string()),
                ("hasCsp", "true".to_string()),
                ("metadata", Self::metadata_query(request)?),
            ],
        )
        .await
    }

    async fn post_choice(
        &self,
        action_type: ActionType,
        body: &ChoiceBody,
    ) -> Result<ConsentResponse, ClientError> {
        let campaign = match body.campaign_type() {
            CampaignType::Gdpr => "gdpr",
            CampaignType::Ccpa => "ccpa",
            CampaignType::AdvertisingOptOut => {
                return Err(ClientError::InvalidUrl(
                    "no choice endpoint for the advertising campaign".into(),
                ));
            }
        };
        let path = format!("choice/{campaign}/{}", action_type.endpoint_segment());
        let url = format!(
            "{}?requestUUID={}",
            self.url(&path),
            self.request_uuid
        );
        self.post_json(&url, body).await
    }

    async fn pv_data(&self, body: &PvDataBody) {
        let result: Result<serde_json::Value, ClientError> =
            self.post_json(&self.url("pv-data"), body).await;
        if let Err(err) = result {
            tracing::debug!(error = %err, "pv-data ping failed");
        }
    }
}
