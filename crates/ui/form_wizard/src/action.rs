use form_engine::ResponseMap;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupResult {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    ClearScreen,
    Error(String),
    /// One-line message for the status bar.
    Notify(String),
    Update,
    Submit,
    Reset,
    /// Pulse the external submit signal of the fill screen.
    TriggerSubmit,
    /// The filled-in form passed validation.
    Submitted(ResponseMap),
    PopupResult(PopupResult),
}
