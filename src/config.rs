use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Percentage of sessions that emit the pv-data telemetry ping.
pub const DEFAULT_SAMPLE_RATE: u8 = 1;

/// Opaque publisher-supplied key/value payload forwarded verbatim on pings
/// and choice posts.
pub type PublisherData = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignEnv {
    Stage,
    Prod,
}

impl Default for CampaignEnv {
    fn default() -> Self {
        Self::Prod
    }
}

/// Consent-message language requested from the service. `BrowserDefault`
/// lets the service pick based on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLanguage {
    #[serde(rename = "BROWSER_DEFAULT")]
    BrowserDefault,
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "DE")]
    German,
    #[serde(rename = "FR")]
    French,
    #[serde(rename = "ES")]
    Spanish,
}

impl Default for MessageLanguage {
    fn default() -> Self {
        Self::BrowserDefault
    }
}

/// Per-campaign configuration supplied by the embedding application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub targeting_params: HashMap<String, String>,
}

/// Which campaign types this coordinator tracks. A `Some` entry means the
/// caller requested that campaign; absent campaigns are never synced.
#[derive(Debug, Clone, Default)]
pub struct Campaigns {
    pub gdpr: Option<CampaignConfig>,
    pub ccpa: Option<CampaignConfig>,
    /// Device-advertising opt-out campaign. Its mere presence forces a
    /// messages fetch regardless of apply-state.
    pub advertising_opt_out: Option<CampaignConfig>,
    pub environment: CampaignEnv,
}

impl Campaigns {
    pub fn gdpr() -> Self {
        Self {
            gdpr: Some(CampaignConfig::default()),
            ..Self::default()
        }
    }

    pub fn ccpa() -> Self {
        Self {
            ccpa: Some(CampaignConfig::default()),
            ..Self::default()
        }
    }
}

/// All configuration the coordinator needs, passed explicitly at
/// construction so tests can control every knob.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub account_id: u32,
    pub property_id: u32,
    /// Property href as registered with the consent service,
    /// e.g. `https://example.com`.
    pub property_name: String,
    pub language: MessageLanguage,
    pub campaigns: Campaigns,
    /// 1..=100 percentage gating the telemetry ping.
    pub sample_rate: u8,
    pub pub_data: PublisherData,
}

impl CoordinatorConfig {
    pub fn new(account_id: u32, property_id: u32, property_name: impl Into<String>) -> Self {
        Self {
            account_id,
            property_id,
            property_name: property_name.into(),
            language: MessageLanguage::default(),
            campaigns: Campaigns::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            pub_data: PublisherData::default(),
        }
    }

    pub fn with_campaigns(mut self, campaigns: Campaigns) -> Self {
        self.campaigns = campaigns;
        self
    }

    pub fn with_sample_rate(mut self, rate: u8) -> Self {
        self.sample_rate = rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_prod_and_one_percent_sampling() {
        let cfg = CoordinatorConfig::new(22, 17_801, "https://example.com");
        assert_eq!(cfg.campaigns.environment, CampaignEnv::Prod);
        assert_eq!(cfg.sample_rate, 1);
        assert_eq!(cfg.language, MessageLanguage::BrowserDefault);
    }

    #[test]
    fn language_serializes_to_wire_codes() {
        assert_eq!(
            serde_json::to_string(&MessageLanguage::BrowserDefault).unwrap(),
            "\"BROWSER_DEFAULT\""
        );
        assert_eq!(serde_json::to_string(&MessageLanguage::German).unwrap(), "\"DE\"");
    }

    #[test]
    fn campaign_shortcuts_request_single_campaign() {
        let c = Campaigns::gdpr();
        assert!(c.gdpr.is_some());
        assert!(c.ccpa.is_none());
        assert!(c.advertising_opt_out.is_none());
    }
}
