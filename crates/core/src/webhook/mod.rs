pub mod dispatcher;
pub mod intent;
pub mod wire;

pub use dispatcher::{WebhookDispatcher, CANCEL_PERIOD_DAYS, CANCEL_PERIOD_PARAMETER};
pub use intent::IntentTag;
pub use wire::{SessionParameters, WebhookRequest, WebhookResponse};
