use crate::config::{CampaignEnv, MessageLanguage, PublisherData};
use crate::consent::{CcpaStatus, ConsentStatus, GranularStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

// ─── meta-data ──────────────────────────────────────────────────────────────

/// Per-campaign identity hints sent with the metadata fetch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataCampaignHint {
    pub has_local_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<MetaDataCampaignHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<MetaDataCampaignHint>,
}

// ─── consent-status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatusCampaign {
    pub has_local_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatusRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<ConsentStatusCampaign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<ConsentStatusCampaign>,
}

// ─── messages ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprCampaignBody {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub targeting_params: HashMap<String, String>,
    pub has_local_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_status: Option<ConsentStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CcpaCampaignBody {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub targeting_params: HashMap<String, String>,
    pub has_local_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CcpaStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisingCampaignBody {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub targeting_params: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignsBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<GdprCampaignBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<CcpaCampaignBody>,
    #[serde(rename = "ios14", skip_serializing_if = "Option::is_none")]
    pub advertising_opt_out: Option<AdvertisingCampaignBody>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesBody {
    pub property_href: String,
    pub account_id: u32,
    pub campaigns: CampaignsBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_state: Option<serde_json::Value>,
    pub consent_language: MessageLanguage,
    pub campaign_env: CampaignEnv,
}

/// Per-campaign applies markers echoed alongside the messages body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliesHint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesMetaData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<AppliesHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<AppliesHint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesRequest {
    pub body: MessagesBody,
    pub metadata: MessagesMetaData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_keyed_local_state: Option<serde_json::Value>,
}

// ─── choice-all ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceAllRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<AppliesHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<AppliesHint>,
}

// ─── post-choice ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprChoiceBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub property_id: String,
    pub message_id: String,
    /// Forwarded verbatim from the choice-all eligibility payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_all_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_list_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub pub_data: PublisherData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_save_and_exit_variables: Option<serde_json::Value>,
    pub sample_rate: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granular_status: Option<GranularStatus>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CcpaChoiceBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub property_id: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_state: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub pub_data: PublisherData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_save_and_exit_variables: Option<serde_json::Value>,
    pub sample_rate: u8,
}

/// One choice post, parameterized by campaign type. GDPR and CCPA are
/// parallel variants of the same operation against sibling endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChoiceBody {
    Gdpr(GdprChoiceBody),
    Ccpa(CcpaChoiceBody),
}

impl ChoiceBody {
    pub fn campaign_type(&self) -> crate::consent::CampaignType {
        match self {
            Self::Gdpr(_) => crate::consent::CampaignType::Gdpr,
            Self::Ccpa(_) => crate::consent::CampaignType::Ccpa,
        }
    }
}

// ─── pv-data ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvDataGdpr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub account_id: u32,
    pub site_id: u32,
    pub consent_status: ConsentStatus,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub pub_data: PublisherData,
    pub sample_rate: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub euconsent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<u32>,
    #[serde(rename = "prtnUUID", skip_serializing_if = "Option::is_none")]
    pub partition_uuid: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvDataCcpa {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub account_id: u32,
    pub site_id: u32,
    pub status: CcpaStatus,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub pub_data: PublisherData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<u64>,
    pub sample_rate: u8,
}

/// Telemetry snapshot; fire-and-forget, the response is ignored.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvDataBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<PvDataGdpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<PvDataCcpa>,
}
