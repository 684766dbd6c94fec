//! Viewer-request interception.

use serde_json::Value;

use crate::config::schema::RedirectConfig;
use crate::interceptor::event::{Decision, EventError, RedirectResponse, ViewerRequest};
use crate::routing::{RedirectRule, RedirectTarget, RuleSet, TargetError};

const PASS_THROUGH: &str = "pass_through";

/// Path that is redirected to the WebSocket backend.
pub const WEBSOCKET_PATH: &str = "/api/v1/ws";

/// Decides, per request, between a redirect and pass-through.
///
/// Holds only immutable rules, so a single instance can be shared across
/// any number of concurrent invocations.
#[derive(Debug)]
pub struct Interceptor {
    rules: RuleSet,
}

impl Interceptor {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The single `/api/v1/ws` → `target` rule.
    pub fn websocket(target: RedirectTarget) -> Self {
        let rule = RedirectRule::exact("websocket", WEBSOCKET_PATH, target);
        Self::new(RuleSet::new().with_rule(rule))
    }

    /// Build the interceptor from the `[redirect]` config section.
    pub fn from_config(config: &RedirectConfig) -> Result<Self, TargetError> {
        let target =
            RedirectTarget::from_endpoint(&config.scheme, &config.endpoint, &config.target_path)?;
        Ok(Self::websocket(target))
    }

    /// Redirect a matching request, hand every other request back untouched.
    pub fn intercept(&self, request: ViewerRequest) -> Decision {
        match self.rules.evaluate(&request.uri) {
            Some(rule) => {
                Decision::Redirect(RedirectResponse::moved_permanently(rule.target().as_str()))
            }
            None => Decision::PassThrough(request),
        }
    }

    /// Run the interceptor over a raw `{ "request": { ... } }` event.
    ///
    /// A request whose `uri` is missing or not a string is returned as-is:
    /// a routing failure must never block the request.
    pub fn handle_event(&self, event: Value) -> Result<Value, EventError> {
        self.evaluate_event(event).map(|(output, _)| output)
    }

    /// Like [`handle_event`](Self::handle_event), also reporting the outcome
    /// label (`"redirect"` or `"pass_through"`) for metrics. Fail-open paths
    /// count as pass-through.
    pub fn evaluate_event(&self, event: Value) -> Result<(Value, &'static str), EventError> {
        let mut event = match event {
            Value::Object(map) => map,
            _ => return Err(EventError::NotAnObject),
        };

        let request = match event.remove("request") {
            Some(request @ Value::Object(_)) => request,
            _ => return Err(EventError::MissingRequest),
        };

        if !request.get("uri").is_some_and(Value::is_string) {
            return Ok((request, PASS_THROUGH));
        }

        let typed = match serde_json::from_value::<ViewerRequest>(request.clone()) {
            Ok(typed) => typed,
            Err(_) => return Ok((request, PASS_THROUGH)),
        };

        match self.intercept(typed) {
            decision @ Decision::Redirect(_) => match serde_json::to_value(&decision) {
                Ok(output) => Ok((output, decision.outcome())),
                Err(_) => Ok((request, PASS_THROUGH)),
            },
            Decision::PassThrough(_) => Ok((request, PASS_THROUGH)),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
