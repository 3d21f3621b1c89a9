// ABOUTME: Module run state types for the type state pattern.
// ABOUTME: Each state carries what the next stage needs, so stages cannot run out of order.

use crate::cluster::DeployAction;
use crate::image::{ReleaseImages, StagedContext};
use crate::types::ImageId;

/// Build context assembled in the staging directory.
/// Available actions: `build()`
#[derive(Debug, Clone)]
pub struct Staged {
    pub(crate) context: StagedContext,
}

/// Image built under its local name.
/// Available actions: `tag()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) images: ReleaseImages,
    pub(crate) image_id: ImageId,
}

impl Built {
    pub fn image_id(&self) -> &ImageId {
        &self.image_id
    }
}

/// Versioned and `latest` registry names applied.
/// Available actions: `push()`
#[derive(Debug, Clone)]
pub struct Tagged {
    pub(crate) images: ReleaseImages,
}

/// Both registry references pushed.
/// Available actions: `deploy()`
#[derive(Debug, Clone)]
pub struct Pushed {
    pub(crate) images: ReleaseImages,
}

/// Cluster deployment points at the versioned image.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy)]
pub struct Deployed {
    pub(crate) action: DeployAction,
}

impl Deployed {
    pub fn action(&self) -> DeployAction {
        self.action
    }
}
