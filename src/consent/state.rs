use super::{CcpaConsent, GdprConsent, GdprMetadata};
use crate::config::Campaigns;
use serde::{Deserialize, Serialize};

/// All mutable state owned by one coordinator lifetime.
///
/// Campaign records exist iff the caller requested that campaign; they are
/// mutated only by response merges during `load_messages`, except for
/// `last_message` attribution and the `needs_resync` flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoordinatorState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<GdprConsent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<CcpaConsent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr_metadata: Option<GdprMetadata>,
    /// One sampling decision per coordinator lifetime; `None` until drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_sampled: Option<bool>,
    /// Opaque blobs round-tripped with the service, never inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_state: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_keyed_local_state: Option<serde_json::Value>,
    /// Set when a choice post failed and the record may be out of sync with
    /// the server. A higher layer should re-sync.
    pub needs_resync: bool,
}

impl CoordinatorState {
    /// Empty record per requested campaign.
    pub fn new(campaigns: &Campaigns) -> Self {
        Self {
            gdpr: campaigns.gdpr.as_ref().map(|_| GdprConsent::empty()),
            ccpa: campaigns.ccpa.as_ref().map(|_| CcpaConsent::empty()),
            ..Self::default()
        }
    }

    /// Recompute the GDPR staleness invariant.
    ///
    /// If the user's consent predates a vendor-list addition or legal-basis
    /// change, the matching flag is raised; if either flag newly flips while
    /// `consented_all` is set, `consented_all` is cleared and
    /// `previous_opt_in_all` recorded. Runs once per sync cycle, after the
    /// metadata and consent-status merges. Never evaluated for CCPA.
    pub fn update_gdpr_status(&mut self) {
        let (Some(gdpr), Some(metadata)) = (self.gdpr.as_mut(), self.gdpr_metadata.as_ref())
        else {
            return;
        };
        let Some(date_created) = gdpr.date_created else {
            return;
        };

        let mut newly_stale = false;
        if date_created < metadata.additions_change_date {
            gdpr.consent_status.vendor_list_additions = true;
            newly_stale = true;
        }
        if date_created < metadata.legal_basis_change_date {
            gdpr.consent_status.legal_basis_changes = true;
            newly_stale = true;
        }
        if newly_stale && gdpr.consent_status.consented_all {
            gdpr.consent_status
                .granular_status
                .get_or_insert_with(Default::default)
                .previous_opt_in_all = true;
            gdpr.consent_status.consented_all = false;
        }
    }
}

// ─── Caller-facing snapshot ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignUserData<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consents: Option<T>,
    pub applies: bool,
}

/// Read-only consent snapshot handed to the caller alongside messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<CampaignUserData<GdprConsent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccpa: Option<CampaignUserData<CcpaConsent>>,
}

impl UserData {
    pub fn from_state(state: &CoordinatorState, campaigns: &Campaigns) -> Self {
        Self {
            gdpr: campaigns.gdpr.as_ref().map(|_| CampaignUserData {
                applies: state.gdpr.as_ref().and_then(|g| g.applies).unwrap_or(false),
                consents: state.gdpr.clone(),
            }),
            ccpa: campaigns.ccpa.as_ref().map(|_| CampaignUserData {
                applies: state.ccpa.as_ref().and_then(|c| c.applies).unwrap_or(false),
                consents: state.ccpa.clone(),
            }),
        }
    }
}
