use crate::config::PublisherData;
use crate::consent::CampaignType;
use serde::{Deserialize, Serialize};

/// What the user did on a consent message or privacy-manager screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    AcceptAll,
    RejectAll,
    SaveAndExit,
    Dismiss,
}

impl ActionType {
    /// Accept-all and reject-all are deterministic choices the service can
    /// pre-compute a payload for; everything else posts as-is.
    pub fn is_choice_all(self) -> bool {
        matches!(self, Self::AcceptAll | Self::RejectAll)
    }

    /// Path segment of the choice endpoint for this action.
    pub fn endpoint_segment(self) -> &'static str {
        match self {
            Self::AcceptAll => "consent-all",
            Self::RejectAll => "reject-all",
            Self::SaveAndExit => "save-and-exit",
            Self::Dismiss => "dismiss",
        }
    }
}

/// A user decision to be reported to the consent service.
#[derive(Debug, Clone)]
pub struct Action {
    pub action_type: ActionType,
    pub campaign_type: CampaignType,
    /// Publisher-supplied key/values forwarded verbatim.
    pub publisher_data: PublisherData,
    /// Save-and-exit variables from the privacy-manager screen, if any.
    pub pm_payload: Option<serde_json::Value>,
}

impl Action {
    pub fn new(action_type: ActionType, campaign_type: CampaignType) -> Self {
        Self {
            action_type,
            campaign_type,
            publisher_data: PublisherData::default(),
            pm_payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_accept_and_reject_all_are_choice_all() {
        assert!(ActionType::AcceptAll.is_choice_all());
        assert!(ActionType::RejectAll.is_choice_all());
        assert!(!ActionType::SaveAndExit.is_choice_all());
        assert!(!ActionType::Dismiss.is_choice_all());
    }

    #[test]
    fn endpoint_segments_match_service_paths() {
        assert_eq!(ActionType::AcceptAll.endpoint_segment(), "consent-all");
        assert_eq!(ActionType::RejectAll.endpoint_segment(), "reject-all");
        assert_eq!(ActionType::SaveAndExit.endpoint_segment(), "save-and-exit");
    }
}
