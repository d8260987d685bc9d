//! Pluggable handle-based directory backend.
//!
//! The backend speaks an opaque handle protocol supplied by the environment:
//! a service connection is opened first, nodes are opened under it, and bulk
//! replies are delivered through size-fixed I/O buffers. Backend handles have
//! no automatic cleanup; [`DirectoryClient`](crate::DirectoryClient) owns
//! their lifecycle and releases them after every operation.

use dirsvc_core::{DirStatus, Result};

/// Opaque reference to an open backend service connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceRef(pub u64);

/// Opaque reference to an open directory node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u64);

/// Opaque reference to a backend-allocated I/O buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferRef(pub u64);

/// Opaque reference to an open record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordRef(pub u64);

/// Continuation token for a paginated fetch still holding backend-side state.
///
/// A pending token must be released through
/// [`DirectoryBackend::release_continuation`] if the fetch is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContinuationToken(pub u64);

/// Record-name selection for a list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelection {
    /// Match every record of the requested type.
    All,
    /// Match records with one of the given names.
    Names(Vec<String>),
}

/// One raw attribute as delivered by the backend: name plus ordered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// Attribute name.
    pub name: String,
    /// Values in backend order; may be empty when the record carries the
    /// attribute without a value.
    pub values: Vec<String>,
}

/// One raw record entry as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Record name.
    pub name: String,
    /// Attribute entries in backend order.
    pub attributes: Vec<RawAttribute>,
}

/// One page of a paginated fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Raw record entries decoded out of the I/O buffer.
    pub records: Vec<RawRecord>,
    /// Token to pass to the next fetch; `None` when no data is pending.
    pub continuation: Option<ContinuationToken>,
}

/// Outcome of one paginated fetch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The reply did not fit the supplied buffer; retry with a larger one.
    BufferTooSmall,
    /// One page of records.
    Page(RecordPage),
}

/// Handle-based directory backend protocol.
///
/// Implementations are blocking; calls return only when the backend has
/// answered. Genuine transport or handle faults are reported as
/// [`Error::Backend`](dirsvc_core::Error::Backend); recoverable conditions
/// (buffer too small, record not found, authentication rejection) are carried
/// in the success value.
#[cfg_attr(test, mockall::automock)]
pub trait DirectoryBackend: Send {
    /// Opens the backend service connection.
    fn open_service(&mut self) -> Result<ServiceRef>;

    /// Closes a service connection.
    fn close_service(&mut self, service: ServiceRef) -> Result<()>;

    /// Opens the named node under an open service.
    fn open_node(&mut self, service: ServiceRef, path: &str) -> Result<NodeRef>;

    /// Closes a node handle.
    fn close_node(&mut self, node: NodeRef) -> Result<()>;

    /// Allocates a size-fixed I/O buffer.
    fn alloc_buffer(&mut self, service: ServiceRef, size: u32) -> Result<BufferRef>;

    /// Frees an I/O buffer.
    fn free_buffer(&mut self, service: ServiceRef, buffer: BufferRef) -> Result<()>;

    /// Fetches one page of records matching the selection.
    #[allow(clippy::too_many_arguments)]
    fn list_records(
        &mut self,
        node: NodeRef,
        buffer: BufferRef,
        selection: &RecordSelection,
        record_type: &str,
        requested: &[String],
        continuation: Option<ContinuationToken>,
    ) -> Result<FetchOutcome>;

    /// Fetches one page of records whose attribute matches the pattern.
    ///
    /// `match_code` is the wire match code with the case-insensitivity flag
    /// already folded in (see [`MatchType::code`](crate::MatchType::code)).
    #[allow(clippy::too_many_arguments)]
    fn search_records(
        &mut self,
        node: NodeRef,
        buffer: BufferRef,
        record_type: &str,
        attribute: &str,
        match_code: u32,
        pattern: &str,
        requested: &[String],
        continuation: Option<ContinuationToken>,
    ) -> Result<FetchOutcome>;

    /// Releases backend-side state held by an abandoned continuation token.
    fn release_continuation(
        &mut self,
        service: ServiceRef,
        continuation: ContinuationToken,
    ) -> Result<()>;

    /// Opens a record by type and name; a missing record is `Ok(None)`.
    fn open_record(
        &mut self,
        node: NodeRef,
        record_type: &str,
        name: &str,
    ) -> Result<Option<RecordRef>>;

    /// Closes a record handle.
    fn close_record(&mut self, record: RecordRef) -> Result<()>;

    /// Submits a one-step authentication request to the node.
    ///
    /// Returns the backend's verdict status; any status other than
    /// [`DirStatus::NO_ERR`] means the credentials were rejected. Transport
    /// and handle faults are `Err`.
    fn authenticate(
        &mut self,
        node: NodeRef,
        method: &str,
        payload: &[u8],
        step_buffer: BufferRef,
    ) -> Result<DirStatus>;
}
