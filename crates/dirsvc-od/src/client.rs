//! Directory client implementation.

use crate::attrs;
use crate::auth::{self, AuthMethod};
use crate::backend::{DirectoryBackend, FetchOutcome};
use crate::config::DirectoryConfig;
use crate::query::{decode_page, FetchRequest};
use crate::record::{AttrValue, MatchType, QueryResult};
use crate::session::OpSession;
use crate::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Directory client bound to one node name, over a pluggable backend.
///
/// Connection scope is per-operation: every call opens the handles it needs
/// and releases them before returning, success or failure. Instances are not
/// safe for concurrent use; serialize access externally.
pub struct DirectoryClient {
    config: DirectoryConfig,
    backend: Box<dyn DirectoryBackend>,
}

impl DirectoryClient {
    /// Creates a directory client over the given backend.
    #[must_use]
    pub fn new(config: DirectoryConfig, backend: Box<dyn DirectoryBackend>) -> Self {
        Self { config, backend }
    }

    /// Returns the configured node name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        self.config.node_name()
    }

    /// Lists all records of a type, returning the requested attributes.
    ///
    /// An empty `attributes` list is a no-op returning an empty result, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](dirsvc_core::Error::Backend) on any
    /// non-recoverable backend fault.
    pub fn list_all_records(
        &mut self,
        record_type: &str,
        attributes: &[String],
    ) -> Result<QueryResult> {
        self.fetch(&FetchRequest::list_all(record_type, attributes))
    }

    /// Queries records whose attribute matches the value.
    ///
    /// An empty `attributes` list is a no-op returning an empty result, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](dirsvc_core::Error::Backend) on any
    /// non-recoverable backend fault.
    pub fn query_by_attribute(
        &mut self,
        attribute: &str,
        value: &str,
        match_type: MatchType,
        case_insensitive: bool,
        record_type: &str,
        attributes: &[String],
    ) -> Result<QueryResult> {
        self.fetch(&FetchRequest::search(
            attribute,
            value,
            match_type,
            case_insensitive,
            record_type,
            attributes,
        ))
    }

    /// Queries records with a pre-built compound boolean expression.
    ///
    /// Reuses the single-attribute search path with the display-name selector
    /// attribute and the compound match code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](dirsvc_core::Error::Backend) on any
    /// non-recoverable backend fault.
    pub fn query_by_compound_expression(
        &mut self,
        expression: &str,
        case_insensitive: bool,
        record_type: &str,
        attributes: &[String],
    ) -> Result<QueryResult> {
        self.fetch(&FetchRequest::search(
            attrs::ATTR_REAL_NAME,
            expression,
            MatchType::CompoundExpression,
            case_insensitive,
            record_type,
            attributes,
        ))
    }

    /// Checks whether a record of the given type and name exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](dirsvc_core::Error::Backend) on any
    /// non-recoverable backend fault.
    pub fn has_record(&mut self, record_type: &str, name: &str) -> Result<bool> {
        let mut session = OpSession::new(self.backend.as_mut());
        session.open_service()?;
        session.open_node(self.config.node_name())?;
        let exists = session.record_exists(record_type, name)?;
        session.close();
        Ok(exists)
    }

    /// Authenticates with a plaintext password against the identity's native
    /// node.
    ///
    /// Returns `false` both when the node cannot be resolved for `guid` and
    /// when the backend rejects the credentials; the two cases are not
    /// distinguishable through the return value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](dirsvc_core::Error::Backend) only for
    /// genuine I/O or handle faults, never for rejected credentials.
    pub fn authenticate_basic(
        &mut self,
        guid: &str,
        user: &str,
        password: &SecretString,
    ) -> Result<bool> {
        let Some(node_path) = self.resolve_auth_node(guid)? else {
            debug!(guid, "no authentication node resolved");
            return Ok(false);
        };
        let payload = auth::basic_payload(user, password.expose_secret());
        self.authenticate_to_node(&node_path, AuthMethod::ClearText, &payload)
    }

    /// Authenticates with HTTP digest challenge/response material against the
    /// identity's native node.
    ///
    /// Same success/failure policy as [`Self::authenticate_basic`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](dirsvc_core::Error::Backend) only for
    /// genuine I/O or handle faults, never for rejected credentials.
    pub fn authenticate_digest(
        &mut self,
        guid: &str,
        user: &str,
        challenge: &str,
        response: &str,
        http_method: &str,
    ) -> Result<bool> {
        let Some(node_path) = self.resolve_auth_node(guid)? else {
            debug!(guid, "no authentication node resolved");
            return Ok(false);
        };
        let payload = auth::digest_payload(user, challenge, response, http_method);
        self.authenticate_to_node(&node_path, AuthMethod::DigestMd5, &payload)
    }

    /// Runs one paginated fetch with buffer-growth retry.
    fn fetch(&mut self, request: &FetchRequest<'_>) -> Result<QueryResult> {
        if request.attributes().is_empty() {
            return Ok(QueryResult::default());
        }

        let mut session = OpSession::new(self.backend.as_mut());
        session.open_service()?;
        session.open_node(self.config.node_name())?;
        session.create_buffer(self.config.initial_buffer_size())?;

        let mut result = QueryResult::default();
        loop {
            let outcome = match request {
                FetchRequest::List {
                    selection,
                    record_type,
                    attributes,
                } => session.list_page(selection, record_type, attributes)?,
                FetchRequest::Search {
                    attribute,
                    pattern,
                    match_code,
                    record_type,
                    attributes,
                } => session.search_page(record_type, attribute, *match_code, pattern, attributes)?,
            };
            match outcome {
                FetchOutcome::BufferTooSmall => session.grow_buffer()?,
                FetchOutcome::Page(page) => {
                    decode_page(&mut result, page);
                    if !session.has_pending_continuation() {
                        break;
                    }
                }
            }
        }
        session.close();

        debug!(records = result.len(), "query complete");
        Ok(result)
    }

    /// Resolves the node that owns authentication for the record `guid`.
    ///
    /// The current node may not support the identity's authentication
    /// directly, so the record's meta-node routing hint names the node to
    /// bind against. Zero or ambiguous matches resolve to `None`.
    fn resolve_auth_node(&mut self, guid: &str) -> Result<Option<String>> {
        let requested = vec![attrs::ATTR_META_NODE_LOCATION.to_string()];
        let found = self.query_by_attribute(
            attrs::ATTR_GENERATED_UID,
            guid,
            MatchType::Exact,
            false,
            attrs::RECORD_TYPE_USERS,
            &requested,
        )?;
        if found.len() != 1 {
            return Ok(None);
        }

        // The routing hint may come back scalar or as a sequence.
        match found.records()[0].attributes.get(attrs::ATTR_META_NODE_LOCATION) {
            Some(AttrValue::Single(value)) => Ok(Some(value.clone())),
            Some(AttrValue::Multi(values)) => Ok(values.first().cloned()),
            None => Ok(None),
        }
    }

    fn authenticate_to_node(
        &mut self,
        node_path: &str,
        method: AuthMethod,
        payload: &[u8],
    ) -> Result<bool> {
        let mut session = OpSession::new(self.backend.as_mut());
        session.open_service()?;
        session.open_node(node_path)?;
        session.create_buffer(self.config.initial_buffer_size())?;
        let status = session.authenticate(method.as_str(), payload)?;
        session.close();

        debug!(node = node_path, %status, "authentication step complete");
        Ok(status.is_ok())
    }
}
