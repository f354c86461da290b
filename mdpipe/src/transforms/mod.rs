//! Tree transforms
//!
//! Each transform works on one tree kind and is wired into the pipeline as a
//! stage. [`to_hast`] is the bridge from the markdown tree to the HTML tree.

pub mod format;
pub mod sanitize;
pub mod slug;
pub mod to_hast;
pub mod toc;
