pub mod bucket;
pub mod data;
pub mod piper;
pub mod reader;
pub mod types;

pub use bucket::{BucketIndex, BucketRegistry, BucketStats};
pub use data::DataFile;
pub use piper::Piper;
pub use reader::IndexFile;
pub use types::*;
