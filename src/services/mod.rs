pub mod deletion;
pub mod media_client;

pub use deletion::{DeletionRelay, DeletionRequest, NormalizedDeletion, RelayError};
pub use media_client::{DeleteResources, HttpMediaClient, MediaApi, MediaApiError, MediaResponse};
