// ABOUTME: Adapter turning engine calls into the build and push stages of a release.
// ABOUTME: Every module gets a versioned tag and a `latest` alias from one build.

use super::{ImageError, ImageOps, StagedContext};
use crate::config::RegistryConfig;
use crate::types::{ImageId, ImageRef, ModuleId, ReleaseTag};

/// The image names produced for one module in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseImages {
    /// Local build name, e.g. `module_3:v6`.
    pub local: ImageRef,
    /// Registry reference carrying the release tag.
    pub versioned: ImageRef,
    /// Registry reference carrying `latest`.
    pub latest: ImageRef,
}

impl ReleaseImages {
    pub fn new(registry: &RegistryConfig, module: &ModuleId, tag: &ReleaseTag) -> Self {
        Self {
            local: ImageRef::local(module, tag),
            versioned: ImageRef::for_release(&registry.host, &registry.project, module, tag),
            latest: ImageRef::latest(&registry.host, &registry.project, module),
        }
    }
}

/// Builds, tags, and pushes module images through an [`ImageOps`] engine.
pub struct ImagePublisher<'a, I: ?Sized> {
    engine: &'a I,
    registry: &'a RegistryConfig,
}

impl<'a, I: ImageOps + ?Sized> ImagePublisher<'a, I> {
    pub fn new(engine: &'a I, registry: &'a RegistryConfig) -> Self {
        Self { engine, registry }
    }

    /// Build the staged context under its local name.
    pub async fn build_local(
        &self,
        module: &ModuleId,
        tag: &ReleaseTag,
        context: &StagedContext,
    ) -> Result<(ReleaseImages, ImageId), ImageError> {
        let images = ReleaseImages::new(self.registry, module, tag);

        tracing::info!(image = %images.local, "building image");
        let image_id = self
            .engine
            .build_image(&context.dir, &context.dockerfile, &images.local)
            .await?;
        tracing::debug!(image = %images.local, id = image_id.short(), "image built");

        Ok((images, image_id))
    }

    /// Give a locally built image both registry names.
    ///
    /// The `latest` alias is only applied after the versioned tag succeeded,
    /// so `latest` never names an image without a matching release tag.
    pub async fn tag_release(&self, images: &ReleaseImages) -> Result<(), ImageError> {
        self.tag_local_image(&images.local, &images.versioned).await?;
        self.tag_local_image(&images.local, &images.latest).await
    }

    pub async fn tag_local_image(
        &self,
        local: &ImageRef,
        target: &ImageRef,
    ) -> Result<(), ImageError> {
        tracing::info!(%local, %target, "tagging image for registry push");
        self.engine.tag_image(local, target).await
    }

    /// Push the versioned reference, then the `latest` alias.
    pub async fn push(&self, images: &ReleaseImages) -> Result<(), ImageError> {
        for reference in [&images.versioned, &images.latest] {
            tracing::info!(%reference, "pushing image");
            self.engine.push_image(reference).await?;
        }
        Ok(())
    }
}
