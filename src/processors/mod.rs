pub mod batch_processor;
pub mod decode_summary;

pub use batch_processor::{BatchOutput, BatchProcessor};
pub use decode_summary::{DecodeFailure, DecodeSummary};
