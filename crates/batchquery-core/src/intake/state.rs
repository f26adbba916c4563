//! Stateful image intake owned by a client.

use tracing::info;

use super::preview::PreviewProvider;
use super::validator;
use crate::domain::{AcceptedImageSet, ImageHandle, IntakeError};
use crate::notice::TransientNotice;

/// Current accepted images, their previews and the current intake error.
pub struct ImageIntake<P: PreviewProvider> {
    images: AcceptedImageSet,
    previews: Vec<P::Preview>,
    provider: P,
    notice: TransientNotice,
}

impl<P: PreviewProvider> ImageIntake<P> {
    pub fn new(provider: P) -> Self {
        Self::with_notice(provider, TransientNotice::default())
    }

    pub fn with_notice(provider: P, notice: TransientNotice) -> Self {
        Self {
            images: AcceptedImageSet::new(),
            previews: Vec::new(),
            provider,
            notice,
        }
    }

    /// Admit candidates; see [`validator::try_add`]. The first error, if any,
    /// becomes the current notice and is also returned.
    pub fn add<I>(&mut self, candidates: I) -> Option<IntakeError>
    where
        I: IntoIterator<Item = ImageHandle>,
    {
        let (next, error) = validator::try_add(&self.images, candidates);
        if next.len() != self.images.len() {
            info!(
                added = next.len() - self.images.len(),
                total = next.len(),
                "images added"
            );
            self.replace(next);
        }
        if let Some(e) = &error {
            self.notice.raise(e.to_string());
        }
        error
    }

    /// Remove the image at `index`, release its preview and clear the
    /// current error.
    pub fn remove_at(&mut self, index: usize) {
        let next = validator::remove_at(&self.images, index);
        if next.len() != self.images.len() {
            info!(index, total = next.len(), "image removed");
            self.replace(next);
        }
        self.notice.clear();
    }

    /// Snapshot of the accepted images. Cheap to clone and unaffected by
    /// later changes.
    pub fn images(&self) -> &AcceptedImageSet {
        &self.images
    }

    pub fn previews(&self) -> &[P::Preview] {
        &self.previews
    }

    pub fn current_error(&self) -> Option<&str> {
        self.notice.current()
    }

    fn replace(&mut self, next: AcceptedImageSet) {
        for preview in self.previews.drain(..) {
            self.provider.release(preview);
        }
        self.previews = next.iter().map(|image| self.provider.create(image)).collect();
        self.images = next;
    }
}

impl<P: PreviewProvider> Drop for ImageIntake<P> {
    fn drop(&mut self) {
        for preview in self.previews.drain(..) {
            self.provider.release(preview);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Hands out numbered previews and tracks which ones are still live.
    #[derive(Default, Clone)]
    struct CountingPreviews {
        next_id: Rc<RefCell<u32>>,
        live: Rc<RefCell<Vec<u32>>>,
    }

    impl PreviewProvider for CountingPreviews {
        type Preview = u32;

        fn create(&self, _image: &ImageHandle) -> u32 {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            self.live.borrow_mut().push(*next);
            *next
        }

        fn release(&self, preview: u32) {
            self.live.borrow_mut().retain(|id| *id != preview);
        }
    }

    fn png(name: &str) -> ImageHandle {
        ImageHandle::from_bytes(name, "image/png", 1, name.as_bytes().to_vec())
    }

    #[test]
    fn test_one_preview_per_image_in_order() {
        let previews = CountingPreviews::default();
        let mut intake = ImageIntake::new(previews.clone());

        intake.add(vec![png("a"), png("b")]);
        assert_eq!(intake.previews().len(), 2);
        assert_eq!(previews.live.borrow().len(), 2);

        intake.add(vec![png("c")]);
        assert_eq!(intake.previews().len(), 3);
        assert_eq!(previews.live.borrow().len(), 3, "old previews must be released");
    }

    #[test]
    fn test_remove_releases_preview_and_clears_error() {
        let previews = CountingPreviews::default();
        let mut intake = ImageIntake::new(previews.clone());

        intake.add(vec![png("a"), png("b")]);
        let err = intake.add(vec![png("a")]);
        assert!(err.is_some());
        assert!(intake.current_error().is_some());

        intake.remove_at(0);
        assert!(intake.current_error().is_none());
        assert_eq!(intake.images().len(), 1);
        assert_eq!(intake.images().get(0).unwrap().name(), "b");
        assert_eq!(previews.live.borrow().len(), 1);
    }

    #[test]
    fn test_rejected_batch_does_not_regenerate_previews() {
        let previews = CountingPreviews::default();
        let mut intake = ImageIntake::new(previews.clone());
        intake.add(vec![png("a")]);
        let before = intake.previews().to_vec();

        intake.add(vec![png("a")]);
        assert_eq!(intake.previews(), before.as_slice());
    }

    #[test]
    fn test_drop_releases_everything() {
        let previews = CountingPreviews::default();
        {
            let mut intake = ImageIntake::new(previews.clone());
            intake.add(vec![png("a"), png("b")]);
        }
        assert!(previews.live.borrow().is_empty());
    }

    #[test]
    fn test_snapshot_survives_later_changes() {
        let mut intake = ImageIntake::new(CountingPreviews::default());
        intake.add(vec![png("a"), png("b")]);
        let snapshot = intake.images().clone();

        intake.remove_at(0);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(intake.images().len(), 1);
    }
}
