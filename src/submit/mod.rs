//! Submission: payload building, the persistence seam and the controller
//! that ties validation, store calls and notifications together.

mod controller;
mod error;
mod http;
mod payload;
mod store;

pub use controller::{
    ErrorHook, Notification, NotificationLevel, Operation, SubmissionController, SubmitMode,
    SubmitOutcome, SuccessHook,
};
pub use error::{ApiErrorBody, ApiMessage, FieldMessage, StoreError};
pub use http::RestClient;
pub use payload::{Payload, PayloadPart};
pub use store::{EntityStore, is_truthy};
