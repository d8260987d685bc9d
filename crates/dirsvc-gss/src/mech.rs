//! Pluggable security-negotiation mechanism.

use dirsvc_core::Error;

/// Opaque handle to an imported principal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameHandle(pub u64);

/// Opaque handle to acquired acceptor credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredHandle(pub u64);

/// Opaque handle to an in-progress security context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CtxHandle(pub u64);

/// Mechanism verdict for one negotiation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// More round trips are required.
    Continue,
    /// The context is established.
    Complete,
}

/// Result of one successful context-initiation or acceptance call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    /// The (possibly newly allocated) context to thread into the next step.
    pub context: CtxHandle,
    /// Outbound token for the peer; may be empty when the mechanism has
    /// nothing to send.
    pub token: Vec<u8>,
    /// Whether the negotiation needs further steps.
    pub state: NegotiationState,
}

/// Diagnostic record for a failed mechanism call.
///
/// Carries both status pairs reported by the security layer; the display
/// texts are concatenated when surfacing the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MechFailure {
    /// Major status code.
    pub major_code: u32,
    /// Display text for the major status.
    pub major_text: String,
    /// Mechanism-specific minor status code.
    pub minor_code: u32,
    /// Display text for the minor status.
    pub minor_text: String,
}

impl From<MechFailure> for Error {
    fn from(failure: MechFailure) -> Self {
        Error::Negotiation {
            major: failure.major_code,
            minor: failure.minor_code,
            message: format!("{} ({})", failure.major_text, failure.minor_text),
        }
    }
}

/// Fallible mechanism call result.
pub type MechResult<T> = std::result::Result<T, MechFailure>;

/// Opaque security-negotiation primitive.
///
/// Token arguments use an empty slice for "no input token"; the first client
/// step legitimately starts with nothing to feed in. Release calls are
/// infallible by contract; a mechanism that can fail during release must
/// swallow and log internally.
#[cfg_attr(test, mockall::automock)]
pub trait Mechanism: Send {
    /// Imports a service principal name.
    fn import_name(&mut self, service: &str) -> MechResult<NameHandle>;

    /// Acquires acceptor credentials for the named principal.
    fn acquire_credential(&mut self, name: NameHandle) -> MechResult<CredHandle>;

    /// Runs one initiator step against the target principal.
    fn init_context(
        &mut self,
        context: Option<CtxHandle>,
        target: NameHandle,
        input: &[u8],
    ) -> MechResult<StepOutput>;

    /// Runs one acceptor step with the initiator's token.
    fn accept_context(
        &mut self,
        context: Option<CtxHandle>,
        credential: CredHandle,
        input: &[u8],
    ) -> MechResult<StepOutput>;

    /// Returns the authenticated peer's display name.
    fn peer_name(&mut self, context: CtxHandle) -> MechResult<String>;

    /// Releases an established or partial context.
    fn release_context(&mut self, context: CtxHandle);

    /// Releases an imported name.
    fn release_name(&mut self, name: NameHandle);

    /// Releases acquired credentials.
    fn release_credential(&mut self, credential: CredHandle);
}
