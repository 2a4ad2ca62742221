use crate::action::Action;
use crate::client::requests::{
    AppliesHint, CampaignsBody, CcpaCampaignBody, CcpaChoiceBody, ChoiceAllRequest, ChoiceBody,
    ConsentStatusCampaign, ConsentStatusRequest, GdprCampaignBody, GdprChoiceBody, MessagesBody,
    MessagesMetaData, MessagesRequest, MetaDataCampaignHint, MetaDataRequest, PvDataBody,
    PvDataCcpa, PvDataGdpr, AdvertisingCampaignBody,
};
use crate::client::responses::{MessageToDisplay, PostPayload, UserConsent};
use crate::client::ConsentApi;
use crate::config::{Campaigns, CoordinatorConfig};
use crate::consent::{CampaignType, CoordinatorState, GdprMetadata, LastMessage, UserData};
use crate::error::{ClientError, ConsentError, Result, Stage};
use crate::sampling;
use crate::storage::ConsentStorage;
use std::sync::Arc;

/// Result of a successful `load_messages` cycle.
#[derive(Debug)]
pub struct LoadMessagesOutcome {
    pub messages: Vec<MessageToDisplay>,
    pub user_data: UserData,
}

/// Owns the versioned local consent state and sequences the dependent
/// service calls of the synchronization workflow.
///
/// One logical workflow per instance: callers must serialize overlapping
/// `load_messages` invocations. The metadata → consent-status → messages
/// chain is strictly sequential; the pv-data ping is spawned independently
/// and may race with it.
pub struct Coordinator<C, S> {
    config: CoordinatorConfig,
    auth_id: Option<String>,
    state: CoordinatorState,
    client: Arc<C>,
    storage: S,
}

impl<C, S> Coordinator<C, S>
where
    C: ConsentApi + 'static,
    S: ConsentStorage,
{
    pub fn new(config: CoordinatorConfig, client: C, storage: S) -> Self {
        let state = CoordinatorState::new(&config.campaigns);
        Self {
            config,
            auth_id: None,
            state,
            client: Arc::new(client),
            storage,
        }
    }

    pub fn with_auth_id(mut self, auth_id: impl Into<String>) -> Self {
        self.auth_id = Some(auth_id.into());
        self
    }

    /// External auth identifier; settable between calls.
    pub fn set_auth_id(&mut self, auth_id: Option<String>) {
        self.auth_id = auth_id;
    }

    pub fn auth_id(&self) -> Option<&str> {
        self.auth_id.as_deref()
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn user_data(&self) -> UserData {
        UserData::from_state(&self.state, &self.config.campaigns)
    }

    // ─── load_messages ──────────────────────────────────────────────────

    /// Run one synchronization cycle and return the messages to display.
    ///
    /// Metadata and consent-status failures degrade gracefully; only a
    /// messages-stage failure is fatal to the call.
    pub async fn load_messages(&mut self) -> Result<LoadMessagesOutcome> {
        self.trigger_pv_data();

        self.meta_data_stage().await;
        if self.should_call_consent_status() {
            self.consent_status_stage().await;
        }
        self.state.update_gdpr_status();

        let outcome = if self.should_call_messages() {
            self.messages_stage().await?
        } else {
            tracing::debug!("no campaign requires a messages fetch");
            LoadMessagesOutcome {
                messages: Vec::new(),
                user_data: self.user_data(),
            }
        };

        self.storage.store_state(&self.state);
        Ok(outcome)
    }

    /// A consent-status fetch is needed when the user is identified, or
    /// once after detecting leftover state from a previous SDK major
    /// version. The legacy signal is consumed by the read.
    fn should_call_consent_status(&mut self) -> bool {
        self.auth_id.is_some() || self.storage.take_legacy_state()
    }

    fn should_call_messages(&self) -> bool {
        should_call_messages(&self.state, &self.config.campaigns)
    }

    async fn meta_data_stage(&mut self) {
        let request = self.meta_data_request();
        match self
            .client
            .meta_data(self.config.account_id, self.config.property_id, &request)
            .await
        {
            Ok(response) => {
                if let Some(gdpr) = response.gdpr {
                    if let Some(record) = self.state.gdpr.as_mut() {
                        record.applies = Some(gdpr.applies);
                    }
                    self.state.gdpr_metadata = Some(GdprMetadata {
                        additions_change_date: gdpr.additions_change_date,
                        legal_basis_change_date: gdpr.legal_basis_change_date,
                    });
                }
                if let (Some(ccpa), Some(record)) = (response.ccpa, self.state.ccpa.as_mut()) {
                    record.applies = Some(ccpa.applies);
                }
            }
            Err(err) => {
                tracing::warn!(stage = %Stage::MetaData, error = %err, "stage failed, proceeding");
            }
        }
    }

    async fn consent_status_stage(&mut self) {
        let request = self.consent_status_request();
        match self
            .client
            .consent_status(self.config.property_id, &request, self.auth_id.as_deref())
            .await
        {
            Ok(response) => {
                if response.local_state.is_some() {
                    self.state.local_state = response.local_state;
                }
                if let Some(gdpr) = response.consent_status_data.gdpr {
                    self.state.gdpr = Some(gdpr);
                }
                if let Some(ccpa) = response.consent_status_data.ccpa {
                    self.state.ccpa = Some(ccpa);
                }
            }
            Err(err) => {
                tracing::warn!(stage = %Stage::ConsentStatus, error = %err, "stage failed, proceeding");
            }
        }
    }

    async fn messages_stage(&mut self) -> Result<LoadMessagesOutcome> {
        let request = self.messages_request();
        let response = self
            .client
            .messages(&request)
            .await
            .map_err(|e| ConsentError::stage(Stage::Messages, e))?;

        self.state.local_state = response.local_state;
        self.state.non_keyed_local_state = response.non_keyed_local_state;

        let messages: Vec<MessageToDisplay> = response
            .campaigns
            .iter()
            .filter_map(MessageToDisplay::from_campaign)
            .collect();

        for message in &messages {
            let last = LastMessage::from(&message.metadata);
            match message.campaign_type {
                CampaignType::Gdpr => {
                    if let Some(record) = self.state.gdpr.as_mut() {
                        record.last_message = Some(last);
                    }
                }
                CampaignType::Ccpa => {
                    if let Some(record) = self.state.ccpa.as_mut() {
                        record.last_message = Some(last);
                    }
                }
                CampaignType::AdvertisingOptOut => {}
            }
        }

        Ok(LoadMessagesOutcome {
            messages,
            user_data: self.user_data(),
        })
    }

    /// Fire-and-forget telemetry, gated by one sampling draw per
    /// coordinator lifetime.
    fn trigger_pv_data(&mut self) {
        let sample_rate = self.config.sample_rate;
        let was_sampled = *self
            .state
            .was_sampled
            .get_or_insert_with(|| sampling::sample_hit(sample_rate));
        if !was_sampled {
            return;
        }

        let body = self.pv_data_body();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            client.pv_data(&body).await;
        });
    }

    // ─── report_action ──────────────────────────────────────────────────

    /// Report a user decision: fetch the choice-all eligibility payload for
    /// deterministic accept/reject-all actions, then post the choice.
    ///
    /// An eligibility failure never blocks the post (the payload is an
    /// enrichment). A post failure is surfaced and flags the record for a
    /// later re-sync.
    pub async fn report_action(&mut self, action: Action) -> Result<UserData> {
        let payload = self.choice_all_stage(&action).await;
        let body = self.choice_body(&action, payload)?;

        match self.client.post_choice(action.action_type, &body).await {
            Ok(response) => {
                self.merge_choice_response(action.campaign_type, response)?;
                self.state.needs_resync = false;
                self.storage.store_state(&self.state);
                Ok(self.user_data())
            }
            Err(err) => {
                self.state.needs_resync = true;
                self.storage.store_state(&self.state);
                tracing::error!(stage = %Stage::PostChoice, error = %err, "choice post failed");
                Err(ConsentError::stage(Stage::PostChoice, err))
            }
        }
    }

    /// Eligibility phase; only runs for accept-all/reject-all.
    async fn choice_all_stage(&self, action: &Action) -> Option<PostPayload> {
        if !action.action_type.is_choice_all() {
            return None;
        }

        let request = ChoiceAllRequest {
            gdpr: self.config.campaigns.gdpr.as_ref().map(|_| AppliesHint {
                applies: Some(self.gdpr_applies()),
            }),
            ccpa: self.config.campaigns.ccpa.as_ref().map(|_| AppliesHint {
                applies: Some(self.ccpa_applies()),
            }),
        };

        match self
            .client
            .choice_all(
                action.action_type,
                self.config.account_id,
                self.config.property_id,
                &request,
            )
            .await
        {
            Ok(response) => response.gdpr.and_then(|gdpr| gdpr.post_payload),
            Err(err) => {
                tracing::warn!(stage = %Stage::ChoiceAll, error = %err, "eligibility fetch failed, posting without payload");
                None
            }
        }
    }

    fn choice_body(&self, action: &Action, payload: Option<PostPayload>) -> Result<ChoiceBody> {
        let message_id = |last: Option<&LastMessage>| last.map_or(0, |m| m.id).to_string();
        match action.campaign_type {
            CampaignType::Gdpr => {
                let payload = payload.unwrap_or_default();
                Ok(ChoiceBody::Gdpr(GdprChoiceBody {
                    auth_id: self.auth_id.clone(),
                    uuid: self.state.gdpr.as_ref().and_then(|g| g.uuid.clone()),
                    property_id: self.config.property_id.to_string(),
                    message_id: message_id(
                        self.state.gdpr.as_ref().and_then(|g| g.last_message.as_ref()),
                    ),
                    consent_all_ref: payload.consent_all_ref,
                    vendor_list_id: payload.vendor_list_id,
                    pub_data: action.publisher_data.clone(),
                    pm_save_and_exit_variables: action.pm_payload.clone(),
                    sample_rate: self.config.sample_rate,
                    granular_status: payload.granular_status,
                }))
            }
            CampaignType::Ccpa => Ok(ChoiceBody::Ccpa(CcpaChoiceBody {
                auth_id: self.auth_id.clone(),
                uuid: self.state.ccpa.as_ref().and_then(|c| c.uuid.clone()),
                property_id: self.config.property_id.to_string(),
                message_id: message_id(
                    self.state.ccpa.as_ref().and_then(|c| c.last_message.as_ref()),
                ),
                local_state: self.state.local_state.clone(),
                pub_data: action.publisher_data.clone(),
                pm_save_and_exit_variables: action.pm_payload.clone(),
                sample_rate: self.config.sample_rate,
            })),
            CampaignType::AdvertisingOptOut => Err(ConsentError::Config(
                "choice reporting is only supported for gdpr and ccpa campaigns".into(),
            )),
        }
    }

    /// Fold the post-choice response back into local state. The response
    /// must carry the campaign variant that was posted.
    fn merge_choice_response(
        &mut self,
        expected: CampaignType,
        response: crate::client::responses::ConsentResponse,
    ) -> Result<()> {
        if response.local_state.is_some() {
            self.state.local_state = response.local_state;
        }
        match (expected, response.user_consent) {
            (CampaignType::Gdpr, UserConsent::Gdpr(mut consents)) => {
                if consents.applies.is_none() {
                    consents.applies = self.state.gdpr.as_ref().and_then(|g| g.applies);
                }
                self.state.gdpr = Some(consents);
                Ok(())
            }
            (CampaignType::Ccpa, UserConsent::Ccpa(mut consents)) => {
                if consents.applies.is_none() {
                    consents.applies = self.state.ccpa.as_ref().and_then(|c| c.applies);
                }
                self.state.ccpa = Some(consents);
                Ok(())
            }
            (expected, _) => Err(ConsentError::stage(
                Stage::PostChoice,
                ClientError::CampaignMismatch { expected },
            )),
        }
    }

    // ─── request shaping ────────────────────────────────────────────────

    fn gdpr_applies(&self) -> bool {
        self.state.gdpr.as_ref().and_then(|g| g.applies).unwrap_or(false)
    }

    fn ccpa_applies(&self) -> bool {
        self.state.ccpa.as_ref().and_then(|c| c.applies).unwrap_or(false)
    }

    fn meta_data_request(&self) -> MetaDataRequest {
        MetaDataRequest {
            gdpr: self.state.gdpr.as_ref().map(|g| MetaDataCampaignHint {
                has_local_data: g.uuid.is_some(),
                date_created: g.date_created,
                uuid: g.uuid.clone(),
            }),
            ccpa: self.state.ccpa.as_ref().map(|c| MetaDataCampaignHint {
                has_local_data: c.uuid.is_some(),
                date_created: c.date_created,
                uuid: c.uuid.clone(),
            }),
        }
    }

    fn consent_status_request(&self) -> ConsentStatusRequest {
        ConsentStatusRequest {
            gdpr: self.state.gdpr.as_ref().map(|g| ConsentStatusCampaign {
                has_local_data: true,
                applies: g.applies,
                date_created: g.date_created,
                uuid: g.uuid.clone(),
            }),
            ccpa: self.state.ccpa.as_ref().map(|c| ConsentStatusCampaign {
                has_local_data: true,
                applies: c.applies,
                date_created: c.date_created,
                uuid: c.uuid.clone(),
            }),
        }
    }

    fn messages_request(&self) -> MessagesRequest {
        let campaigns = &self.config.campaigns;
        MessagesRequest {
            body: MessagesBody {
                property_href: self.config.property_name.clone(),
                account_id: self.config.account_id,
                campaigns: CampaignsBody {
                    gdpr: campaigns.gdpr.as_ref().map(|cfg| GdprCampaignBody {
                        targeting_params: cfg.targeting_params.clone(),
                        has_local_data: self
                            .state
                            .gdpr
                            .as_ref()
                            .is_some_and(|g| g.uuid.is_some()),
                        consent_status: self
                            .state
                            .gdpr
                            .as_ref()
                            .map(|g| g.consent_status.clone()),
                    }),
                    ccpa: campaigns.ccpa.as_ref().map(|cfg| CcpaCampaignBody {
                        targeting_params: cfg.targeting_params.clone(),
                        has_local_data: self
                            .state
                            .ccpa
                            .as_ref()
                            .is_some_and(|c| c.uuid.is_some()),
                        status: self.state.ccpa.as_ref().map(|c| c.status),
                    }),
                    advertising_opt_out: campaigns.advertising_opt_out.as_ref().map(|cfg| {
                        AdvertisingCampaignBody {
                            targeting_params: cfg.targeting_params.clone(),
                        }
                    }),
                },
                local_state: self.state.local_state.clone(),
                consent_language: self.config.language,
                campaign_env: campaigns.environment,
            },
            metadata: MessagesMetaData {
                gdpr: self.state.gdpr.as_ref().map(|g| AppliesHint { applies: g.applies }),
                ccpa: self.state.ccpa.as_ref().map(|c| AppliesHint { applies: c.applies }),
            },
            non_keyed_local_state: self.state.non_keyed_local_state.clone(),
        }
    }

    fn pv_data_body(&self) -> PvDataBody {
        PvDataBody {
            gdpr: self.state.gdpr.as_ref().map(|g| PvDataGdpr {
                applies: g.applies,
                uuid: g.uuid.clone(),
                account_id: self.config.account_id,
                site_id: self.config.property_id,
                consent_status: g.consent_status.clone(),
                pub_data: self.config.pub_data.clone(),
                sample_rate: self.config.sample_rate,
                euconsent: g.euconsent.clone(),
                msg_id: g.last_message.as_ref().map(|m| m.id),
                category_id: g.last_message.as_ref().map(|m| m.category_id),
                sub_category_id: g.last_message.as_ref().map(|m| m.sub_category_id),
                partition_uuid: g.last_message.as_ref().map(|m| m.partition_uuid.clone()),
            }),
            ccpa: self.state.ccpa.as_ref().map(|c| PvDataCcpa {
                applies: c.applies,
                uuid: c.uuid.clone(),
                account_id: self.config.account_id,
                site_id: self.config.property_id,
                status: c.status,
                pub_data: self.config.pub_data.clone(),
                message_id: c.last_message.as_ref().map(|m| m.id),
                sample_rate: self.config.sample_rate,
            }),
        }
    }
}

/// A messages fetch is required if GDPR applies without full consent, if
/// CCPA applies, or if the advertising campaign was requested at all.
fn should_call_messages(state: &CoordinatorState, campaigns: &Campaigns) -> bool {
    let gdpr_needs_message = state
        .gdpr
        .as_ref()
        .is_some_and(|g| g.applies == Some(true) && !g.consent_status.consented_all);
    let ccpa_needs_message = state
        .ccpa
        .as_ref()
        .is_some_and(|c| c.applies == Some(true));
    gdpr_needs_message || ccpa_needs_message || campaigns.advertising_opt_out.is_some()
}
