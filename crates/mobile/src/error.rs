use offline_maps_core::offline::LoadOptionsError;
use offline_maps_core::resource::ResourceOptionsError;

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum OfflineError {
    #[error(transparent)]
    ResourceOptions(#[from] ResourceOptionsError),

    #[error(transparent)]
    LoadOptions(#[from] LoadOptionsError),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
