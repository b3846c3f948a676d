pub mod aggregator;
pub mod histogram;
pub mod kernel;
pub mod padding;
pub mod reduction;

pub use aggregator::Aggregator;
pub use histogram::HistogramEngine;
pub use kernel::Kernel;
pub use padding::{PaddedBuffer, WorkGroupPadder};
pub use reduction::{ReduceOp, ReductionEngine};
