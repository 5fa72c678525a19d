pub mod controller;

pub use controller::{ChatController, SubmitOutcome, FALLBACK_REPLY, SEND_ERROR_REPLY};
