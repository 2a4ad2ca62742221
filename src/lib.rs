#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod action;
pub mod client;
pub mod config;
pub mod consent;
pub mod coordinator;
pub mod error;
pub mod sampling;
pub mod storage;

pub use action::{Action, ActionType};
pub use client::{ConsentApi, HttpConsentApi, MessageToDisplay};
pub use config::{CampaignConfig, CampaignEnv, Campaigns, CoordinatorConfig, MessageLanguage};
pub use consent::{CampaignType, CoordinatorState, UserData};
pub use coordinator::{Coordinator, LoadMessagesOutcome};
pub use error::{ClientError, ConsentError, Result, Stage};
pub use storage::{ConsentStorage, InMemoryStorage};
