// ABOUTME: Validated domain types for modules, release tags, and image references.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod image_ref;
mod module;
mod release_tag;

pub use id::{CommitId, ImageId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use module::{ModuleId, ModuleIdError};
pub use release_tag::{ReleaseTag, ReleaseTagError};
