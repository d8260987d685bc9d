//! Per-operation resource handle management.

use crate::backend::{
    BufferRef, ContinuationToken, DirectoryBackend, FetchOutcome, NodeRef, RecordSelection,
    ServiceRef,
};
use dirsvc_core::{DirStatus, Error, Result};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct IoBuffer {
    handle: BufferRef,
    size: u32,
}

/// Scoped owner of the handles used by one directory operation.
///
/// Acquisition is strictly ordered: service, then node, then buffer. Release
/// runs in reverse order (pending continuation first), is idempotent, and
/// also runs on drop, so no exit path can leak a handle. Backend faults
/// during release cannot be propagated and are logged instead.
pub(crate) struct OpSession<'a> {
    backend: &'a mut dyn DirectoryBackend,
    service: Option<ServiceRef>,
    node: Option<NodeRef>,
    buffer: Option<IoBuffer>,
    continuation: Option<ContinuationToken>,
}

impl<'a> OpSession<'a> {
    pub(crate) fn new(backend: &'a mut dyn DirectoryBackend) -> Self {
        Self {
            backend,
            service: None,
            node: None,
            buffer: None,
            continuation: None,
        }
    }

    /// Opens the service connection if not already open.
    pub(crate) fn open_service(&mut self) -> Result<()> {
        if self.service.is_none() {
            self.service = Some(self.backend.open_service()?);
        }
        Ok(())
    }

    fn service(&self) -> Result<ServiceRef> {
        self.service
            .ok_or_else(|| Error::InternalError("service handle is not open".to_string()))
    }

    fn node(&self) -> Result<NodeRef> {
        self.node
            .ok_or_else(|| Error::InternalError("node handle is not open".to_string()))
    }

    fn buffer(&self) -> Result<IoBuffer> {
        self.buffer
            .ok_or_else(|| Error::InternalError("I/O buffer is not allocated".to_string()))
    }

    /// Opens the named node under the open service.
    pub(crate) fn open_node(&mut self, path: &str) -> Result<()> {
        let service = self.service()?;
        if self.node.is_some() {
            return Err(Error::InternalError(
                "node handle is already open".to_string(),
            ));
        }
        self.node = Some(self.backend.open_node(service, path)?);
        Ok(())
    }

    /// Allocates the I/O buffer if not already allocated.
    pub(crate) fn create_buffer(&mut self, initial_size: u32) -> Result<()> {
        if self.buffer.is_none() {
            let service = self.service()?;
            let handle = self.backend.alloc_buffer(service, initial_size)?;
            self.buffer = Some(IoBuffer {
                handle,
                size: initial_size,
            });
        }
        Ok(())
    }

    /// Replaces the buffer with one of exactly double the current size.
    ///
    /// Backend buffers are size-fixed, so growth frees and re-allocates.
    /// Growth past `u32::MAX` reports buffer allocation failure.
    pub(crate) fn grow_buffer(&mut self) -> Result<()> {
        let service = self.service()?;
        let old = self.buffer()?;
        let new_size = old
            .size
            .checked_mul(2)
            .ok_or_else(|| Error::backend(DirStatus::NULL_DATA_BUFFER))?;
        self.buffer = None;
        self.backend.free_buffer(service, old.handle)?;
        let handle = self.backend.alloc_buffer(service, new_size)?;
        self.buffer = Some(IoBuffer {
            handle,
            size: new_size,
        });
        Ok(())
    }

    /// Returns true while a paginated fetch has backend data pending.
    pub(crate) fn has_pending_continuation(&self) -> bool {
        self.continuation.is_some()
    }

    /// Fetches one page of a list operation, tracking the continuation token.
    pub(crate) fn list_page(
        &mut self,
        selection: &RecordSelection,
        record_type: &str,
        requested: &[String],
    ) -> Result<FetchOutcome> {
        let node = self.node()?;
        let buffer = self.buffer()?;
        let outcome = self.backend.list_records(
            node,
            buffer.handle,
            selection,
            record_type,
            requested,
            self.continuation,
        )?;
        if let FetchOutcome::Page(page) = &outcome {
            self.continuation = page.continuation;
        }
        Ok(outcome)
    }

    /// Fetches one page of an attribute search, tracking the continuation token.
    pub(crate) fn search_page(
        &mut self,
        record_type: &str,
        attribute: &str,
        match_code: u32,
        pattern: &str,
        requested: &[String],
    ) -> Result<FetchOutcome> {
        let node = self.node()?;
        let buffer = self.buffer()?;
        let outcome = self.backend.search_records(
            node,
            buffer.handle,
            record_type,
            attribute,
            match_code,
            pattern,
            requested,
            self.continuation,
        )?;
        if let FetchOutcome::Page(page) = &outcome {
            self.continuation = page.continuation;
        }
        Ok(outcome)
    }

    /// Checks whether a record of the given type and name exists.
    pub(crate) fn record_exists(&mut self, record_type: &str, name: &str) -> Result<bool> {
        let node = self.node()?;
        match self.backend.open_record(node, record_type, name)? {
            Some(record) => {
                self.backend.close_record(record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Submits a one-step authentication request through the open node.
    pub(crate) fn authenticate(&mut self, method: &str, payload: &[u8]) -> Result<DirStatus> {
        let node = self.node()?;
        let buffer = self.buffer()?;
        self.backend.authenticate(node, method, payload, buffer.handle)
    }

    /// Releases everything still held, in strict reverse acquisition order.
    ///
    /// Safe to call multiple times or with nothing open.
    pub(crate) fn close(&mut self) {
        if let (Some(token), Some(service)) = (self.continuation.take(), self.service) {
            if let Err(err) = self.backend.release_continuation(service, token) {
                warn!("failed to release continuation data: {err}");
            }
        }
        if let (Some(buffer), Some(service)) = (self.buffer.take(), self.service) {
            if let Err(err) = self.backend.free_buffer(service, buffer.handle) {
                warn!("failed to free I/O buffer: {err}");
            }
        }
        if let Some(node) = self.node.take() {
            if let Err(err) = self.backend.close_node(node) {
                warn!("failed to close node handle: {err}");
            }
        }
        if let Some(service) = self.service.take() {
            if let Err(err) = self.backend.close_service(service) {
                warn!("failed to close service handle: {err}");
            }
        }
    }
}

impl Drop for OpSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
