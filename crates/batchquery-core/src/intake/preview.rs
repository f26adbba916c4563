//! Display collaborator for accepted images.

use crate::domain::ImageHandle;

/// Produces a displayable resource for an image and releases it again.
///
/// [`ImageIntake`](super::ImageIntake) regenerates one preview per image, in
/// set order, whenever the set changes, and releases every preview it
/// replaces or drops.
pub trait PreviewProvider {
    type Preview;

    fn create(&self, image: &ImageHandle) -> Self::Preview;

    fn release(&self, preview: Self::Preview);
}
