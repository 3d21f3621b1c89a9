// ABOUTME: Bollard-based image operations.
// ABOUTME: Works with Docker and Podman via the Docker-compatible API.

use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::query_parameters::{
    BuildImageOptionsBuilder, CreateImageOptions, PushImageOptionsBuilder, TagImageOptionsBuilder,
};
use bytes::Bytes;
use futures::StreamExt;
use std::path::{Path, PathBuf};

use super::{EngineSocket, ImageError, ImageOps};
use crate::types::{ImageId, ImageRef};

/// Registry credentials passed to push and pull.
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
    pub server: String,
}

/// Image operations implemented with bollard.
pub struct BollardImages {
    client: Docker,
    credentials: Option<DockerCredentials>,
}

impl BollardImages {
    pub fn new(client: Docker) -> Self {
        Self {
            client,
            credentials: None,
        }
    }

    /// Connect to the engine listening on `socket`.
    pub fn connect(socket: &EngineSocket) -> Result<Self, ImageError> {
        let client = Docker::connect_with_unix(&socket.path, 120, bollard::API_DEFAULT_VERSION)
            .map_err(|e| ImageError::Connection(e.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn with_credentials(mut self, credentials: RegistryCredentials) -> Self {
        self.credentials = Some(DockerCredentials {
            username: Some(credentials.username),
            password: Some(credentials.password),
            serveraddress: Some(credentials.server),
            ..Default::default()
        });
        self
    }
}

/// Pack `dir` as an uncompressed tar archive rooted at `.`.
async fn archive_context(dir: &Path) -> Result<Vec<u8>, ImageError> {
    let dir: PathBuf = dir.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut builder = tar::Builder::new(Vec::new());
        builder.follow_symlinks(true);
        builder.append_dir_all(".", &dir)?;
        builder.into_inner()
    })
    .await
    .map_err(|e| ImageError::Context(e.to_string()))?
    .map_err(|e| ImageError::Context(e.to_string()))
}

#[async_trait]
impl ImageOps for BollardImages {
    async fn build_image(
        &self,
        context_dir: &Path,
        dockerfile: &str,
        tag: &ImageRef,
    ) -> Result<ImageId, ImageError> {
        let archive = archive_context(context_dir).await?;
        let image_name = tag.to_string();

        let options = BuildImageOptionsBuilder::default()
            .dockerfile(dockerfile)
            .t(&image_name)
            .rm(true)
            .build();

        let mut stream =
            self.client
                .build_image(options, None, Some(bollard::body_full(Bytes::from(archive))));

        let mut image_id = None;
        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| ImageError::BuildFailed(format!("{image_name}: {e}")))?;
            if let Some(error) = info.error_detail.and_then(|d| d.message) {
                return Err(ImageError::BuildFailed(format!("{image_name}: {error}")));
            }
            if let Some(line) = info.stream.as_deref().map(str::trim)
                && !line.is_empty()
            {
                tracing::debug!(image = %image_name, "{}", line);
            }
            if let Some(id) = info.aux.and_then(|aux| aux.id) {
                image_id = Some(id);
            }
        }

        // Older engines don't report aux; the tag itself identifies the image
        Ok(ImageId::new(image_id.unwrap_or(image_name)))
    }

    async fn tag_image(&self, source: &ImageRef, target: &ImageRef) -> Result<(), ImageError> {
        let options = TagImageOptionsBuilder::default()
            .repo(&target.repository())
            .tag(target.tag())
            .build();

        self.client
            .tag_image(&source.to_string(), Some(options))
            .await
            .map_err(|e| ImageError::TagFailed {
                source_ref: source.to_string(),
                target: target.to_string(),
                reason: e.to_string(),
            })
    }

    async fn push_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let push_error = |reason: String| ImageError::PushFailed {
            reference: reference.to_string(),
            reason,
        };

        let options = PushImageOptionsBuilder::default()
            .tag(reference.tag())
            .build();

        let mut stream = self.client.push_image(
            &reference.repository(),
            Some(options),
            self.credentials.clone(),
        );

        // Push returns a stream of progress updates - consume it
        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| push_error(e.to_string()))?;
            if let Some(error) = info.error_detail.and_then(|d| d.message) {
                return Err(push_error(error));
            }
        }

        Ok(())
    }

    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError> {
        let image_name = reference.to_string();

        match self.client.inspect_image(&image_name).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(ImageError::Runtime(format!(
                "failed to inspect {}: {}",
                image_name, e
            ))),
        }
    }

    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image_name = reference.to_string();
        let opts = CreateImageOptions {
            from_image: Some(image_name.clone()),
            ..Default::default()
        };

        let mut stream = self
            .client
            .create_image(Some(opts), None, self.credentials.clone());
        while let Some(result) = stream.next().await {
            result.map_err(|e| ImageError::PullFailed(format!("{}: {}", image_name, e)))?;
        }

        Ok(())
    }
}
