//! Authentication request framing.
//!
//! Native authentication is a one-step scheme: the request is a sequence of
//! length-prefixed fields, each length a 4-byte native-byte-order integer
//! with no encoding transformation applied to the field bytes.

/// Authentication method selector understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMethod {
    /// Plaintext "basic" bind.
    ClearText,
    /// Challenge-response DIGEST-MD5 bind.
    DigestMd5,
}

impl AuthMethod {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::ClearText => "dsAuthMethodStandard:dsAuthClearText",
            Self::DigestMd5 => "dsAuthMethodStandard:dsAuthDIGEST-MD5",
        }
    }
}

fn push_field(payload: &mut Vec<u8>, field: &[u8]) {
    let length = u32::try_from(field.len()).unwrap_or(u32::MAX);
    payload.extend_from_slice(&length.to_ne_bytes());
    payload.extend_from_slice(field);
}

/// Builds the clear-text bind payload: `[len][user][len][password]`.
pub(crate) fn basic_payload(user: &str, password: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(8 + user.len() + password.len());
    push_field(&mut payload, user.as_bytes());
    push_field(&mut payload, password.as_bytes());
    payload
}

/// Builds the digest bind payload:
/// `[len][user][len][challenge][len][response][len][method]`.
pub(crate) fn digest_payload(
    user: &str,
    challenge: &str,
    response: &str,
    http_method: &str,
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(
        16 + user.len() + challenge.len() + response.len() + http_method.len(),
    );
    push_field(&mut payload, user.as_bytes());
    push_field(&mut payload, challenge.as_bytes());
    push_field(&mut payload, response.as_bytes());
    push_field(&mut payload, http_method.as_bytes());
    payload
}
