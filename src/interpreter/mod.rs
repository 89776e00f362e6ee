//! Free-text command interpretation via a generative-language service.
//!
//! One round trip per command: the prompt embeds the current view state
//! as plain key/value context and instructs the service to answer with a
//! single JSON object (`updates`, `message`) and nothing else. The
//! response is untrusted, so it goes through a staged pipeline — raw text
//! → fence-stripped candidate → strict JSON → per-field validated
//! [`StateUpdate`] — where anything unrecognized is dropped, never
//! applied. A response that is not JSON at all is still shown to the
//! user verbatim as the message, and a service failure degrades to a
//! fixed fallback message with no state change.

mod gemini;

pub use gemini::GeminiClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::InterpreterError;
use crate::state::{ColorMode, ReprStyle, StateUpdate, ViewState};

/// Message shown when the language service is unreachable or broken.
pub const FALLBACK_MESSAGE: &str =
    "I couldn't reach the language service. Please try again.";

/// Message used when a well-formed reply carries no message of its own.
pub const DEFAULT_MESSAGE: &str = "Done.";

/// Boundary to the remote generative-language service.
pub trait LanguageService {
    /// Send one prompt and return the raw reply text.
    fn complete(&self, prompt: &str) -> Result<String, InterpreterError>;
}

/// The interpreter's result: a validated (possibly empty) partial state
/// and a user-facing message. Always produced, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Validated partial update to merge into the view state.
    pub update: StateUpdate,
    /// Message to append to the conversation log.
    pub message: String,
}

/// Interpret one free-text command against the current view state.
///
/// Service failures are recovered here: the outcome carries
/// [`FALLBACK_MESSAGE`] and an empty update.
pub fn interpret(
    service: &dyn LanguageService,
    input: &str,
    state: &ViewState,
) -> CommandOutcome {
    let prompt = build_prompt(input, state);
    match service.complete(&prompt) {
        Ok(raw) => parse_reply(&raw),
        Err(e) => {
            log::warn!("command interpretation failed: {e}");
            CommandOutcome {
                update: StateUpdate::default(),
                message: FALLBACK_MESSAGE.to_owned(),
            }
        }
    }
}

/// Build the instruction prompt with the state embedded as context.
fn build_prompt(input: &str, state: &ViewState) -> String {
    let styles: Vec<&str> =
        ReprStyle::ALL.iter().map(|s| s.as_str()).collect();
    let modes: Vec<&str> =
        ColorMode::ALL.iter().map(|m| m.as_str()).collect();
    format!(
        "You control a molecular structure viewer. Reply with exactly one \
         JSON object and nothing else: no prose, no code fences. Allowed \
         keys: \"updates\" (optional object) and \"message\" (short string \
         shown to the user).\n\
         Recognized \"updates\" fields:\n\
         - style: one of {styles}\n\
         - colorMode: one of {modes}\n\
         - tint: hex color like \"#4f46e5\" (used with colorMode uniform)\n\
         - showWater: boolean\n\
         - showHetero: boolean\n\
         Current state:\n\
         - structure: {structure}\n\
         - style: {style}\n\
         - colorMode: {color_mode}\n\
         - tint: {tint}\n\
         - showWater: {show_water}\n\
         - showHetero: {show_hetero}\n\
         User request: {input}",
        styles = styles.join(" | "),
        modes = modes.join(" | "),
        structure =
            state.structure_id.as_deref().unwrap_or("none loaded"),
        style = state.style.as_str(),
        color_mode = state.color_mode.as_str(),
        tint = state.tint,
        show_water = state.show_water,
        show_hetero = state.show_hetero,
    )
}

/// Parse and validate a raw service reply.
///
/// Exposed so the rejection policy can be audited and tested without a
/// network call.
#[must_use]
pub fn parse_reply(raw: &str) -> CommandOutcome {
    let text = strip_code_fences(raw);
    let candidate = serde_json::from_str::<Value>(text).ok();
    let Some(object) = candidate.as_ref().and_then(Value::as_object) else {
        // Not JSON (or not an object): a readable answer is still worth
        // showing, just with nothing to apply.
        return CommandOutcome {
            update: StateUpdate::default(),
            message: raw.trim().to_owned(),
        };
    };

    let update = object
        .get("updates")
        .map_or_else(StateUpdate::default, validate_updates);
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| DEFAULT_MESSAGE.to_owned(), ToOwned::to_owned);

    CommandOutcome { update, message }
}

/// Strip a surrounding Markdown code fence, if present.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // The fence line may carry a language tag (```json)
        text = rest.split_once('\n').map_or(rest, |(_, body)| body);
        if let Some(body) = text.trim_end().strip_suffix("```") {
            text = body;
        }
    }
    text.trim()
}

/// Accept only recognized fields with in-vocabulary values; drop the
/// rest silently (logged at debug).
fn validate_updates(value: &Value) -> StateUpdate {
    let Some(map) = value.as_object() else {
        log::debug!("updates is not an object, ignoring");
        return StateUpdate::default();
    };

    let mut update = StateUpdate::default();
    for (key, raw) in map {
        match key.as_str() {
            "style" => update.style = field(key, raw),
            "colorMode" => update.color_mode = field(key, raw),
            "tint" => update.tint = field(key, raw),
            "showWater" => update.show_water = field(key, raw),
            "showHetero" => update.show_hetero = field(key, raw),
            _ => log::debug!("dropping unrecognized update field {key:?}"),
        }
    }
    update
}

fn field<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!("dropping invalid value for {key:?}: {e}");
            None
        }
    }
}
