//! Admission rules for the image intake, exercised over many candidate
//! sequences.

use batchquery_core::{try_add, AcceptedImageSet, ImageHandle, IntakeError, MAX_IMAGES};

const MIMES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/svg+xml",
    "image/bmp",
    "image/tiff",
    "text/plain",
];

/// Deterministic pseudo-random candidates: names collide often enough to
/// produce duplicates, mime types include unsupported ones.
fn candidates(seed: u64, count: usize) -> Vec<ImageHandle> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let name = format!("img-{}.bin", (state >> 33) % 5);
            let mime = MIMES[((state >> 17) % MIMES.len() as u64) as usize];
            let size = ((state >> 40) % 3) as usize + 1;
            ImageHandle::from_bytes(name, mime, 1_700_000_000_000, vec![0u8; size])
        })
        .collect()
}

fn no_pairwise_duplicates(set: &AcceptedImageSet) -> bool {
    let images = set.as_slice();
    images.iter().enumerate().all(|(i, a)| {
        images[i + 1..]
            .iter()
            .all(|b| !a.metadata().same_identity(b.metadata()))
    })
}

#[test]
fn test_set_never_exceeds_limit_or_holds_duplicates() {
    for seed in 0..500u64 {
        let mut set = AcceptedImageSet::new();
        for chunk in candidates(seed, 12).chunks(3) {
            let (next, _) = try_add(&set, chunk.to_vec());
            assert!(next.len() <= MAX_IMAGES, "seed {seed}: {} images", next.len());
            assert!(no_pairwise_duplicates(&next), "seed {seed}: duplicate admitted");
            set = next;
        }
    }
}

#[test]
fn test_unsupported_types_always_rejected() {
    for mime in ["image/bmp", "image/tiff", "image/heic", "text/plain", ""] {
        let candidate = ImageHandle::from_bytes("x", mime, 0, vec![1]);
        let (set, err) = try_add(&AcceptedImageSet::new(), vec![candidate]);
        assert_eq!(
            err,
            Some(IntakeError::UnsupportedType {
                mime_type: mime.to_string()
            })
        );
        assert!(set.is_empty());
    }
}

#[test]
fn test_only_first_error_is_reported() {
    let candidates = vec![
        ImageHandle::from_bytes("a.png", "image/png", 1, vec![1]),
        ImageHandle::from_bytes("a.png", "image/png", 1, vec![1]),
        ImageHandle::from_bytes("b.bmp", "image/bmp", 2, vec![2]),
    ];
    let (set, err) = try_add(&AcceptedImageSet::new(), candidates);
    assert!(matches!(err, Some(IntakeError::DuplicateImage { .. })));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_duplicate_check_uses_current_images_only() {
    let original = ImageHandle::from_bytes("scan.jpg", "image/jpeg", 99, vec![5; 10]);
    let (set, _) = try_add(&AcceptedImageSet::new(), vec![original.clone()]);

    let set = batchquery_core::remove_at(&set, 0);
    let (set, err) = try_add(&set, vec![original]);
    assert!(err.is_none());
    assert_eq!(set.len(), 1);
}
