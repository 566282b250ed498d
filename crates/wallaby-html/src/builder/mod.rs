//! Document builder module: token stream → element tree.

/// Root-normalization post-pass.
pub mod cleaner;
/// Stack-based tree assembly.
pub mod core;

pub use self::cleaner::clean;
pub use self::core::DocumentBuilder;
