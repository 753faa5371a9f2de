pub mod dto;

pub use dto::{FactRow, ManifestFactsResponse};
