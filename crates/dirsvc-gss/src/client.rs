//! Initiator side of the handshake.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use dirsvc_core::Error;
use tracing::debug;

use crate::mech::{CtxHandle, Mechanism, NameHandle, NegotiationState};
use crate::{ExchangeState, Result};

/// Client (initiator) handshake exchange.
///
/// Drive with [`step`](Self::step) once per round trip, sending
/// [`response`](Self::response) to the peer and feeding back its challenge,
/// until the state is [`ExchangeState::Complete`].
pub struct ClientExchange {
    mech: Box<dyn Mechanism>,
    target: Option<NameHandle>,
    context: Option<CtxHandle>,
    response: Option<String>,
    username: Option<String>,
    state: ExchangeState,
}

impl ClientExchange {
    /// Starts an exchange targeting the named service principal.
    ///
    /// Imports the target name only; no context exists until the first step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Negotiation`] if the mechanism rejects the name.
    pub fn new(mut mech: Box<dyn Mechanism>, service: &str) -> Result<Self> {
        let target = mech.import_name(service).map_err(Error::from)?;
        Ok(Self {
            mech,
            target: Some(target),
            context: None,
            response: None,
            username: None,
            state: ExchangeState::Initialized,
        })
    }

    /// Runs one initiator step.
    ///
    /// The retained response is cleared first. A missing or empty challenge
    /// skips base64 decoding entirely; the first step legitimately has no
    /// challenge. A non-empty output token is re-encoded and retained as the
    /// response. On completion the peer's display name is retained.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for malformed base64 or a spent exchange;
    /// [`Error::Negotiation`] for mechanism failures, after which only
    /// [`clean`](Self::clean) is useful.
    pub fn step(&mut self, challenge: Option<&str>) -> Result<ExchangeState> {
        self.response = None;
        if self.state == ExchangeState::Failed {
            return Err(Error::InvalidRequest(
                "exchange already failed; clean and start over".to_string(),
            ));
        }
        let Some(target) = self.target else {
            return Err(Error::InvalidRequest(
                "exchange has been cleaned".to_string(),
            ));
        };

        let input = match challenge {
            Some(text) if !text.is_empty() => STANDARD.decode(text).map_err(|err| {
                Error::InvalidRequest(format!("malformed base64 challenge: {err}"))
            })?,
            _ => Vec::new(),
        };

        // Keep the partial context reachable for clean() if this step fails.
        let context = self.context.take();
        let output = match self.mech.init_context(context, target, &input) {
            Ok(output) => output,
            Err(failure) => {
                self.context = context;
                self.state = ExchangeState::Failed;
                return Err(failure.into());
            }
        };
        self.context = Some(output.context);
        if !output.token.is_empty() {
            self.response = Some(STANDARD.encode(&output.token));
        }

        match output.state {
            NegotiationState::Continue => self.state = ExchangeState::Continue,
            NegotiationState::Complete => match self.mech.peer_name(output.context) {
                Ok(name) => {
                    self.username = Some(name);
                    self.state = ExchangeState::Complete;
                }
                Err(failure) => {
                    self.state = ExchangeState::Failed;
                    return Err(failure.into());
                }
            },
        }
        debug!(state = ?self.state, "initiator step complete");
        Ok(self.state)
    }

    /// Base64 response produced by the most recent step, if any.
    #[must_use]
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Authenticated peer display name; set once the exchange completes.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Current exchange state.
    #[must_use]
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Releases mechanism handles and retained strings. Idempotent.
    pub fn clean(&mut self) {
        if let Some(context) = self.context.take() {
            self.mech.release_context(context);
        }
        if let Some(target) = self.target.take() {
            self.mech.release_name(target);
        }
        self.response = None;
        self.username = None;
    }
}

impl Drop for ClientExchange {
    fn drop(&mut self) {
        self.clean();
    }
}
