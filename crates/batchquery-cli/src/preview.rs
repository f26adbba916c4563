//! Terminal thumbnails: a one-line label per image.

use batchquery_core::{ImageHandle, PreviewProvider};
use tracing::trace;

#[derive(Debug, Default, Clone, Copy)]
pub struct LabelPreview;

impl PreviewProvider for LabelPreview {
    type Preview = String;

    fn create(&self, image: &ImageHandle) -> String {
        format!(
            "{} ({}, {})",
            image.name(),
            human_size(image.metadata().byte_size),
            image.mime_type()
        )
    }

    fn release(&self, preview: String) {
        trace!(%preview, "preview released");
    }
}

fn human_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let image = ImageHandle::from_bytes("a.jpg", "image/jpeg", 0, vec![0; 2048]);
        assert_eq!(LabelPreview.create(&image), "a.jpg (2.0 KiB, image/jpeg)");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(12), "12 B");
        assert_eq!(human_size(1536), "1.5 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
