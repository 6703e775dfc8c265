//! Tree traversal and pass descriptors.
//!
//! - **`pass`**: [`SanitizationPass`] (what one traversal applies) and
//!   [`PassReport`] (what it did).
//! - **`walk`**: [`Sanitizer`], the recursive traversal over `serde_json::Value`.

mod pass;
mod walk;

pub use pass::{PassReport, SanitizationPass};
pub use walk::Sanitizer;
