pub mod http;
pub mod requests;
pub mod responses;

pub use http::HttpConsentApi;
pub use requests::{
    ChoiceAllRequest, ChoiceBody, ConsentStatusRequest, GdprChoiceBody, CcpaChoiceBody,
    MessagesRequest, MetaDataRequest, PvDataBody,
};
pub use responses::{
    ChoiceAllResponse, ConsentResponse, ConsentStatusResponse, MessageToDisplay,
    MessagesResponse, MetaDataResponse, PostPayload, UserConsent,
};

use crate::action::ActionType;
use crate::error::ClientError;
use async_trait::async_trait;

/// The remote consent service, one method per logical operation.
///
/// Every call completes with a typed payload or a classified failure; no
/// retries happen at this layer, and no ordering is assumed between
/// independently issued calls.
#[async_trait]
pub trait ConsentApi: Send + Sync {
    async fn meta_data(
        &self,
        account_id: u32,
        property_id: u32,
        request: &MetaDataRequest,
    ) -> Result<MetaDataResponse, ClientError>;

    async fn consent_status(
        &self,
        property_id: u32,
        request: &ConsentStatusRequest,
        auth_id: Option<&str>,
    ) -> Result<ConsentStatusResponse, ClientError>;

    async fn messages(&self, request: &MessagesRequest) -> Result<MessagesResponse, ClientError>;

    async fn choice_all(
        &self,
        action_type: ActionType,
        account_id: u32,
        property_id: u32,
        request: &ChoiceAllRequest,
    ) -> Result<ChoiceAllResponse, ClientError>;

    async fn post_choice(
        &self,
        action_type: ActionType,
        body: &ChoiceBody,
    ) -> Result<ConsentResponse, ClientError>;

    /// Best-effort telemetry ping; the outcome is ignored by callers.
    async fn pv_data(&self, body: &PvDataBody);
}
