// ABOUTME: Container image collaborator: build, tag, push via the engine API.
// ABOUTME: Exports the ImageOps trait, the bollard engine, and the publish adapter.

mod bollard;
mod context;
mod detection;
mod error;
mod publisher;

pub use self::bollard::{BollardImages, RegistryCredentials};
pub use context::{StagedContext, stage_build_context};
pub use detection::{EngineSocket, detect_local};
pub use error::ImageError;
pub use publisher::{ImagePublisher, ReleaseImages};

use crate::types::{ImageId, ImageRef};
use async_trait::async_trait;
use std::path::Path;

/// Image operations against a container engine.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Build `context_dir` with the named Dockerfile and tag the result as `tag`.
    async fn build_image(
        &self,
        context_dir: &Path,
        dockerfile: &str,
        tag: &ImageRef,
    ) -> Result<ImageId, ImageError>;

    /// Add `target` as another name for the local image `source`.
    async fn tag_image(&self, source: &ImageRef, target: &ImageRef) -> Result<(), ImageError>;

    /// Upload `reference` to its registry.
    async fn push_image(&self, reference: &ImageRef) -> Result<(), ImageError>;

    /// Check if an image exists locally.
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError>;

    /// Pull an image from its registry.
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError>;
}
