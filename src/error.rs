use crate::consent::CampaignType;
use thiserror::Error;

// ─── Workflow stages ─────────────────────────────────────────────────────────

/// Which step of the synchronization workflow produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MetaData,
    ConsentStatus,
    Messages,
    ChoiceAll,
    PostChoice,
    PvData,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MetaData => "meta-data",
            Self::ConsentStatus => "consent-status",
            Self::Messages => "messages",
            Self::ChoiceAll => "choice-all",
            Self::PostChoice => "post-choice",
            Self::PvData => "pv-data",
        };
        f.write_str(name)
    }
}

// ─── Remote service errors ──────────────────────────────────────────────────

/// Failures produced by a single call to the remote consent service.
///
/// `Transport` means no usable response arrived; `Decoding` means a response
/// arrived but could not be interpreted as the expected type;
/// `CampaignMismatch` means the response decoded but carried the wrong
/// campaign variant for the branch that issued the call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response decoding failed: {0}")]
    Decoding(String),

    #[error("expected a {expected} consent payload, got a different campaign")]
    CampaignMismatch { expected: CampaignType },

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decoding(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `consentsync`.
///
/// Stage-tagged so callers can tell a fatal messages-stage failure from a
/// failed choice post; internal code continues to use `anyhow::Result` for
/// ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: ClientError,
    },

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConsentError {
    pub fn stage(stage: Stage, source: ClientError) -> Self {
        Self::Stage { stage, source }
    }

    /// The workflow stage this error came from, when known.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ConsentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_displays_stage_name() {
        let err = ConsentError::stage(Stage::Messages, ClientError::Transport("timeout".into()));
        assert!(err.to_string().contains("messages stage failed"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn failed_stage_returns_tag() {
        let err = ConsentError::stage(Stage::PostChoice, ClientError::Decoding("eof".into()));
        assert_eq!(err.failed_stage(), Some(Stage::PostChoice));
    }

    #[test]
    fn anyhow_interop() {
        let err: ConsentError = anyhow::anyhow!("something went wrong").into();
        assert!(err.to_string().contains("something went wrong"));
        assert_eq!(err.failed_stage(), None);
    }

    #[test]
    fn campaign_mismatch_names_expected_campaign() {
        let err = ClientError::CampaignMismatch {
            expected: CampaignType::Gdpr,
        };
        assert!(err.to_string().contains("gdpr"));
    }
}
