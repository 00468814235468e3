mod aggregator;
mod assembler;
mod normalizer;

pub use aggregator::Aggregation;
pub use assembler::{Assembler, CustomerFallback};
pub use normalizer::{NormalizeReport, Normalizer};
