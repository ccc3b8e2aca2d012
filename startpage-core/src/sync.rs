// startpage-core/src/sync.rs
use crate::config::ConfigDocument;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sync provider '{0}' is unavailable")]
    Unavailable(String),
}

/// Remote copy of the configuration document
pub trait SyncProvider {
    /// Fetch the remote document; `Ok(None)` when there is nothing newer
    fn pull(&mut self) -> Result<Option<ConfigDocument>, SyncError>;

    /// Push the document after a successful local save
    fn push(&mut self, document: &ConfigDocument) -> Result<(), SyncError>;
}

/// Placeholder until a real cloud provider exists
#[derive(Debug, Default, Clone, Copy)]
pub struct StubSync;

impl SyncProvider for StubSync {
    fn pull(&mut self) -> Result<Option<ConfigDocument>, SyncError> {
        tracing::info!("Cloud sync not yet implemented");
        Ok(None)
    }

    fn push(&mut self, _document: &ConfigDocument) -> Result<(), SyncError> {
        tracing::info!("Cloud sync not yet implemented");
        Ok(())
    }
}
