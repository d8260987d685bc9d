//! Acceptor side of the handshake.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use dirsvc_core::Error;
use tracing::debug;

use crate::mech::{CredHandle, CtxHandle, Mechanism, NameHandle, NegotiationState};
use crate::{ExchangeState, Result};

/// Server (acceptor) handshake exchange.
///
/// Unlike the initiator, the acceptor cannot start the negotiation: every
/// [`step`](Self::step) requires the initiator's challenge.
pub struct ServerExchange {
    mech: Box<dyn Mechanism>,
    name: Option<NameHandle>,
    credential: Option<CredHandle>,
    context: Option<CtxHandle>,
    response: Option<String>,
    username: Option<String>,
    state: ExchangeState,
}

impl ServerExchange {
    /// Starts an exchange accepting for the named service principal.
    ///
    /// Imports the service name and acquires acceptor credentials for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Negotiation`] if the mechanism rejects the name or
    /// cannot acquire credentials.
    pub fn new(mut mech: Box<dyn Mechanism>, service: &str) -> Result<Self> {
        let name = mech.import_name(service).map_err(Error::from)?;
        let credential = match mech.acquire_credential(name) {
            Ok(credential) => credential,
            Err(failure) => {
                mech.release_name(name);
                return Err(failure.into());
            }
        };
        Ok(Self {
            mech,
            name: Some(name),
            credential: Some(credential),
            context: None,
            response: None,
            username: None,
            state: ExchangeState::Initialized,
        })
    }

    /// Runs one acceptor step with the initiator's base64 challenge.
    ///
    /// The retained response is cleared first. On completion the initiating
    /// principal's display name is retained.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for an empty or malformed challenge, raised
    /// before any mechanism call; [`Error::Negotiation`] for mechanism
    /// failures.
    pub fn step(&mut self, challenge: &str) -> Result<ExchangeState> {
        self.response = None;
        if self.state == ExchangeState::Failed {
            return Err(Error::InvalidRequest(
                "exchange already failed; clean and start over".to_string(),
            ));
        }
        let Some(credential) = self.credential else {
            return Err(Error::InvalidRequest(
                "exchange has been cleaned".to_string(),
            ));
        };
        if challenge.is_empty() {
            return Err(Error::InvalidRequest(
                "acceptor step requires a challenge".to_string(),
            ));
        }

        let input = STANDARD.decode(challenge).map_err(|err| {
            Error::InvalidRequest(format!("malformed base64 challenge: {err}"))
        })?;

        // Keep the partial context reachable for clean() if this step fails.
        let context = self.context.take();
        let output = match self.mech.accept_context(context, credential, &input) {
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
        debug!(state = ?self.state, "acceptor step complete");
        Ok(self.state)
    }

    /// Base64 response produced by the most recent step, if any.
    #[must_use]
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Authenticated initiator display name; set once the exchange completes.
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
        if let Some(credential) = self.credential.take() {
            self.mech.release_credential(credential);
        }
        if let Some(name) = self.name.take() {
            self.mech.release_name(name);
        }
        self.response = None;
        self.username = None;
    }
}

impl Drop for ServerExchange {
    fn drop(&mut self) {
        self.clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mech::{MechFailure, MockMechanism, StepOutput};

    fn accepting_mock() -> MockMechanism {
        let mut mech = MockMechanism::new();
        mech.expect_import_name()
            .withf(|service| service == "http@calendar.example.com")
            .times(1)
            .returning(|_| Ok(NameHandle(1)));
        mech.expect_acquire_credential()
            .withf(|name| *name == NameHandle(1))
            .times(1)
            .returning(|_| Ok(CredHandle(2)));
        mech.expect_release_credential()
            .withf(|credential| *credential == CredHandle(2))
            .times(1)
            .return_const(());
        mech.expect_release_name().times(1).return_const(());
        mech
    }

    #[test]
    fn empty_challenge_is_refused_without_mechanism_calls() {
        let mech = accepting_mock();
        let mut exchange =
            ServerExchange::new(Box::new(mech), "http@calendar.example.com").unwrap();
        let err = exchange.step("").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert_eq!(exchange.state(), ExchangeState::Initialized);
    }

    #[test]
    fn acceptance_produces_response_and_initiator_name() {
        let mut mech = accepting_mock();
        let challenge = STANDARD.encode(b"client-token");
        mech.expect_accept_context()
            .withf(|context, credential, input| {
                context.is_none() && *credential == CredHandle(2) && input == b"client-token"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(StepOutput {
                    context: CtxHandle(7),
                    token: b"tok-b".to_vec(),
                    state: NegotiationState::Complete,
                })
            });
        mech.expect_peer_name()
            .withf(|context| *context == CtxHandle(7))
            .times(1)
            .returning(|_| Ok("cdaboo@EXAMPLE.COM".to_string()));
        mech.expect_release_context().times(1).return_const(());

        let mut exchange =
            ServerExchange::new(Box::new(mech), "http@calendar.example.com").unwrap();
        let state = exchange.step(&challenge).unwrap();
        assert_eq!(state, ExchangeState::Complete);
        assert_eq!(exchange.response(), Some(STANDARD.encode(b"tok-b").as_str()));
        assert_eq!(exchange.username(), Some("cdaboo@EXAMPLE.COM"));
    }

    #[test]
    fn partial_context_is_released_after_mid_handshake_failure() {
        let mut mech = accepting_mock();
        let mut calls = 0;
        mech.expect_accept_context()
            .times(2)
            .returning(move |_, _, _| {
                calls += 1;
                if calls == 1 {
                    Ok(StepOutput {
                        context: CtxHandle(7),
                        token: b"tok-b".to_vec(),
                        state: NegotiationState::Continue,
                    })
                } else {
                    Err(MechFailure {
                        major_code: 0x000B_0000,
                        major_text: "Miscellaneous failure".to_string(),
                        minor_code: 1,
                        minor_text: "mech says no".to_string(),
                    })
                }
            });
        mech.expect_release_context()
            .withf(|context| *context == CtxHandle(7))
            .times(1)
            .return_const(());

        let mut exchange =
            ServerExchange::new(Box::new(mech), "http@calendar.example.com").unwrap();
        exchange.step(&STANDARD.encode(b"one")).unwrap();
        exchange.step(&STANDARD.encode(b"two")).unwrap_err();
        assert_eq!(exchange.state(), ExchangeState::Failed);
        // Drop cleans; the partial context from step one must be released.
    }

    #[test]
    fn credential_acquisition_failure_releases_the_name() {
        let mut mech = MockMechanism::new();
        mech.expect_import_name()
            .times(1)
            .returning(|_| Ok(NameHandle(1)));
        mech.expect_acquire_credential().times(1).returning(|_| {
            Err(MechFailure {
                major_code: 0x000D_0000,
                major_text: "Invalid credential".to_string(),
                minor_code: 0,
                minor_text: "keytab not found".to_string(),
            })
        });
        mech.expect_release_name()
            .withf(|name| *name == NameHandle(1))
            .times(1)
            .return_const(());

        let err = ServerExchange::new(Box::new(mech), "http@calendar.example.com")
            .err()
            .unwrap();
        assert!(matches!(err, Error::Negotiation { .. }));
    }

    #[test]
    fn clean_releases_credential_and_name_once() {
        let mech = accepting_mock();
        let mut exchange =
            ServerExchange::new(Box::new(mech), "http@calendar.example.com").unwrap();
        exchange.clean();
        exchange.clean();

        // A cleaned exchange refuses further steps.
        let err = exchange.step("aGVsbG8=").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
