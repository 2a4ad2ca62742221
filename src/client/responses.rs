use crate::consent::{
    CampaignType, CcpaConsent, CcpaStatus, GdprConsent, GranularStatus, LastMessage,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// ─── meta-data ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataGdpr {
    pub applies: bool,
    pub additions_change_date: DateTime<Utc>,
    pub legal_basis_change_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataCcpa {
    pub applies: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaDataResponse {
    pub gdpr: Option<MetaDataGdpr>,
    pub ccpa: Option<MetaDataCcpa>,
}

// ─── consent-status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentStatusData {
    pub gdpr: Option<GdprConsent>,
    pub ccpa: Option<CcpaConsent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatusResponse {
    #[serde(default)]
    pub local_state: Option<serde_json::Value>,
    pub consent_status_data: ConsentStatusData,
}

// ─── messages ───────────────────────────────────────────────────────────────

/// Attribution metadata of one message, recorded as `last_message` when the
/// message is handed to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetaData {
    pub message_id: u64,
    pub category_id: u32,
    pub sub_category_id: u32,
    #[serde(rename = "messagePartitionUUID")]
    pub message_partition_uuid: String,
}

impl From<&MessageMetaData> for LastMessage {
    fn from(meta: &MessageMetaData) -> Self {
        Self {
            id: meta.message_id,
            category_id: meta.category_id,
            sub_category_id: meta.sub_category_id,
            partition_uuid: meta.message_partition_uuid.clone(),
        }
    }
}

/// The consent payload a campaign carries, tagged by campaign type.
/// Consumption sites must match exhaustively; receiving the wrong variant
/// for the branch that asked is a `CampaignMismatch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "consents")]
pub enum UserConsent {
    #[serde(rename = "gdpr")]
    Gdpr(GdprConsent),
    #[serde(rename = "ccpa")]
    Ccpa(CcpaConsent),
    #[serde(rename = "ios14")]
    AdvertisingOptOut,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub message_meta_data: Option<MessageMetaData>,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub user_consent: Option<UserConsent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    #[serde(default)]
    pub local_state: Option<serde_json::Value>,
    #[serde(default)]
    pub non_keyed_local_state: Option<serde_json::Value>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

/// A consent prompt ready for the presentation layer: only campaigns with a
/// renderable message + metadata + url triple become one of these.
#[derive(Debug, Clone)]
pub struct MessageToDisplay {
    pub message: serde_json::Value,
    pub metadata: MessageMetaData,
    pub url: Url,
    pub campaign_type: CampaignType,
    pub child_pm_id: Option<String>,
}

impl MessageToDisplay {
    /// `None` when the campaign has nothing renderable.
    pub fn from_campaign(campaign: &Campaign) -> Option<Self> {
        let (Some(message), Some(metadata), Some(url)) = (
            campaign.message.as_ref(),
            campaign.message_meta_data.as_ref(),
            campaign.url.as_ref(),
        ) else {
            return None;
        };

        let child_pm_id = match &campaign.user_consent {
            Some(UserConsent::Gdpr(consents)) => consents.child_pm_id.clone(),
            Some(UserConsent::Ccpa(consents)) => consents.child_pm_id.clone(),
            Some(UserConsent::AdvertisingOptOut) | None => None,
        };

        Some(Self {
            message: message.clone(),
            metadata: metadata.clone(),
            url: url.clone(),
            campaign_type: campaign.campaign_type,
            child_pm_id,
        })
    }
}

// ─── choice-all ─────────────────────────────────────────────────────────────

/// Enrichment returned by the eligibility fetch, forwarded verbatim into
/// the GDPR choice post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPayload {
    pub consent_all_ref: Option<String>,
    pub vendor_list_id: Option<String>,
    pub granular_status: Option<GranularStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GdprChoice {
    pub post_payload: Option<PostPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CcpaChoice {
    pub status: Option<CcpaStatus>,
    pub uspstring: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceAllResponse {
    pub gdpr: Option<GdprChoice>,
    pub ccpa: Option<CcpaChoice>,
}

// ─── post-choice ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentResponse {
    #[serde(default)]
    pub local_state: Option<serde_json::Value>,
    pub user_consent: UserConsent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderable_campaign() -> serde_json::Value {
        json!({
            "type": "gdpr",
            "message": {"title": "We value your privacy"},
            "messageMetaData": {
                "messageId": 123, "categoryId": 1, "subCategoryId": 5,
                "messagePartitionUUID": "part-1"
            },
            "url": "https://cdn.example.com/index.html?message_id=123",
            "userConsent": {"type": "gdpr", "consents": {"childPmId": "pm-child"}}
        })
    }

    #[test]
    fn renderable_campaign_becomes_display_message() {
        let campaign: Campaign = serde_json::from_value(renderable_campaign()).unwrap();
        let display = MessageToDisplay::from_campaign(&campaign).unwrap();
        assert_eq!(display.campaign_type, CampaignType::Gdpr);
        assert_eq!(display.metadata.message_id, 123);
        assert_eq!(display.child_pm_id.as_deref(), Some("pm-child"));
    }

    #[test]
    fn campaign_without_url_is_not_displayable() {
        let mut raw = renderable_campaign();
        raw.as_object_mut().unwrap().remove("url");
        let campaign: Campaign = serde_json::from_value(raw).unwrap();
        assert!(MessageToDisplay::from_campaign(&campaign).is_none());
    }

    #[test]
    fn campaign_without_message_is_not_displayable() {
        let mut raw = renderable_campaign();
        raw.as_object_mut().unwrap().remove("message");
        let campaign: Campaign = serde_json::from_value(raw).unwrap();
        assert!(MessageToDisplay::from_campaign(&campaign).is_none());
    }

    #[test]
    fn message_meta_data_maps_to_last_message() {
        let meta = MessageMetaData {
            message_id: 42,
            category_id: 1,
            sub_category_id: 7,
            message_partition_uuid: "part-9".into(),
        };
        let last = LastMessage::from(&meta);
        assert_eq!(last.id, 42);
        assert_eq!(last.partition_uuid, "part-9");
    }

    #[test]
    fn user_consent_tag_dispatches_by_campaign() {
        let gdpr: UserConsent =
            serde_json::from_value(json!({"type": "gdpr", "consents": {}})).unwrap();
        assert!(matches!(gdpr, UserConsent::Gdpr(_)));

        let att: UserConsent = serde_json::from_value(json!({"type": "ios14"})).unwrap();
        assert!(matches!(att, UserConsent::AdvertisingOptOut));
    }

    #[test]
    fn choice_all_response_decodes_post_payload() {
        let response: ChoiceAllResponse = serde_json::from_value(json!({
            "gdpr": {
                "postPayload": {
                    "consentAllRef": "ref-1",
                    "vendorListId": "vl-2",
                    "granularStatus": {"previousOptInAll": false}
                }
            }
        }))
        .unwrap();
        let payload = response.gdpr.unwrap().post_payload.unwrap();
        assert_eq!(payload.consent_all_ref.as_deref(), Some("ref-1"));
        assert_eq!(payload.vendor_list_id.as_deref(), Some("vl-2"));
    }

    #[test]
    fn meta_data_response_tolerates_missing_campaigns() {
        let response: MetaDataResponse = serde_json::from_value(json!({
            "ccpa": {"applies": true}
        }))
        .unwrap();
        assert!(response.gdpr.is_none());
        assert!(response.ccpa.unwrap().applies);
    }
}
