pub mod dataset;
pub mod filter;
pub mod histogram;
pub mod observation;
pub mod summary;

pub use dataset::{ObservationSet, ParseStats};
pub use filter::{FilterCriteria, FilterField};
pub use histogram::{BinLayout, Histogram, HistogramBin};
pub use observation::{fixed_to_degrees, to_fixed_point, Observation};
pub use summary::{MonthlySummary, TemperatureSummary};
