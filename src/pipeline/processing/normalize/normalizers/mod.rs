// Base trait and metrics wrapper shared by the format normalizers
pub mod base;

// One normalizer per upstream shape
pub mod format_a;
pub mod format_b;
pub mod format_c;

// Re-export the main components
pub use base::{MetricsNormalizer, SourceNormalizer};
pub use format_a::FormatANormalizer;
pub use format_b::FormatBNormalizer;
pub use format_c::FormatCNormalizer;
