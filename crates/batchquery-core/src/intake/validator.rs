//! Admission rules for candidate images.
//!
//! Rules are checked in order for each candidate and the first violation
//! stops the whole call:
//!
//! 1. the working set already holds [`MAX_IMAGES`] → `LimitExceeded`
//! 2. declared media type outside the accepted set → `UnsupportedType`
//! 3. same `(name, byte_size, last_modified)` as a present image → `DuplicateImage`
//!
//! Candidates admitted before the failing one are kept.

use tracing::debug;

use crate::domain::{AcceptedImageSet, ImageHandle, IntakeError, MediaType, MAX_IMAGES};

/// Admit `candidates` on top of `current`.
///
/// Returns the new set and the first error encountered, if any. `current`
/// is never modified.
pub fn try_add<I>(current: &AcceptedImageSet, candidates: I) -> (AcceptedImageSet, Option<IntakeError>)
where
    I: IntoIterator<Item = ImageHandle>,
{
    let mut working: Vec<ImageHandle> = current.iter().cloned().collect();
    let mut error = None;

    for candidate in candidates {
        if let Err(e) = admit(&working, &candidate) {
            debug!(name = %candidate.name(), error = %e, "image rejected");
            error = Some(e);
            break;
        }
        debug!(name = %candidate.name(), index = working.len(), "image accepted");
        working.push(candidate);
    }

    (AcceptedImageSet::from_vec(working), error)
}

fn admit(working: &[ImageHandle], candidate: &ImageHandle) -> Result<(), IntakeError> {
    if working.len() >= MAX_IMAGES {
        return Err(IntakeError::LimitExceeded);
    }
    if MediaType::from_mime(candidate.mime_type()).is_none() {
        return Err(IntakeError::UnsupportedType {
            mime_type: candidate.mime_type().to_string(),
        });
    }
    if working
        .iter()
        .any(|present| present.metadata().same_identity(candidate.metadata()))
    {
        return Err(IntakeError::DuplicateImage {
            name: candidate.name().to_string(),
        });
    }
    Ok(())
}

/// Set without the image at `index`. Never fails; the caller validates
/// `index`, and an out-of-range value leaves the set as it was.
pub fn remove_at(current: &AcceptedImageSet, index: usize) -> AcceptedImageSet {
    current.without(index)
}
