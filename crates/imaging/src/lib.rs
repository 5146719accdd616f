//! Image optimization: compresses uploaded creatives to fit a byte budget.

pub mod optimizer;

pub use optimizer::{optimize, ImageOptimizer, OptimizedImage, OutputFormat};
