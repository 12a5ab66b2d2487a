pub mod document;

pub use document::{split_range, PdfDocument};
