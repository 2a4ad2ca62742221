pub mod state;

pub use state::{CampaignUserData, CoordinatorState, UserData};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Campaign types ──────────────────────────────────────────────────────────

/// A regulatory consent regime tracked independently by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignType {
    #[serde(rename = "gdpr")]
    Gdpr,
    #[serde(rename = "ccpa")]
    Ccpa,
    /// Device-advertising opt-out prompt (ATT-style).
    #[serde(rename = "ios14")]
    AdvertisingOptOut,
}

impl std::fmt::Display for CampaignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Gdpr => "gdpr",
            Self::Ccpa => "ccpa",
            Self::AdvertisingOptOut => "ios14",
        };
        f.write_str(name)
    }
}

// ─── GDPR consent ───────────────────────────────────────────────────────────

/// Vendor/purpose-level consent summary returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GranularStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_consent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_leg_int: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose_consent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose_leg_int: Option<String>,
    /// Set when a stale vendor list forces `consented_all` off so the
    /// service knows the user had previously opted in to everything.
    pub previous_opt_in_all: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentStatus {
    pub consented_all: bool,
    pub consented_to_any: bool,
    pub rejected_any: bool,
    pub has_consent_data: bool,
    /// The vendor list gained entries after the user's last decision.
    pub vendor_list_additions: bool,
    /// A vendor's legal basis changed after the user's last decision.
    pub legal_basis_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granular_status: Option<GranularStatus>,
}

/// Local snapshot of the user's GDPR consent. `applies` stays unknown until
/// a metadata round-trip resolves it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GdprConsent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    /// IAB TC string as last returned by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub euconsent: Option<String>,
    pub consent_status: ConsentStatus,
    /// Child privacy-manager id to render instead of the default one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_pm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
}

impl GdprConsent {
    pub fn empty() -> Self {
        Self::default()
    }
}

// ─── CCPA consent ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CcpaStatus {
    ConsentedAll,
    RejectedAll,
    RejectedSome,
    RejectedNone,
}

impl Default for CcpaStatus {
    fn default() -> Self {
        Self::RejectedNone
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CcpaConsent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    pub status: CcpaStatus,
    /// US privacy string as last returned by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uspstring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_pm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
}

impl CcpaConsent {
    pub fn empty() -> Self {
        Self::default()
    }
}

// ─── Message attribution ────────────────────────────────────────────────────

/// Identity of the last message shown for a campaign, required to attribute
/// a later reported action to the message that prompted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub id: u64,
    pub category_id: u32,
    pub sub_category_id: u32,
    pub partition_uuid: String,
}

// ─── GDPR metadata ──────────────────────────────────────────────────────────

/// Server-side change markers from the latest metadata fetch, compared
/// against `date_created` to detect stale consent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprMetadata {
    pub additions_change_date: DateTime<Utc>,
    pub legal_basis_change_date: DateTime<Utc>,
}
