//! Image intake: selection, validation and de-duplication of images.
//!
//! # Modules
//!
//! - [`validator`]: `try_add()` / `remove_at()` over immutable `AcceptedImageSet`s
//! - [`preview`]  : `PreviewProvider`, the display collaborator
//! - [`state`]    : `ImageIntake`, the stateful component a client owns

pub mod preview;
pub mod state;
pub mod validator;

pub use state::ImageIntake;
pub use preview::PreviewProvider;
pub use validator::{remove_at, try_add};
