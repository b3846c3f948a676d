use crate::error::{ProcessingError, Result};
use crate::models::{Histogram, MonthlySummary, ObservationSet, TemperatureSummary};
use crate::processors::{HistogramEngine, Kernel, ReduceOp, ReductionEngine};
use crate::settings::Settings;
use crate::utils::cancel::CancellationToken;
use crate::utils::constants::DEFAULT_WORK_GROUP_SIZE;
use tracing::{debug, info};

/// Runs the statistic passes over a temperature buffer on a dedicated pool.
///
/// min, max and sum are independent and run concurrently; the histogram
/// needs a finished [`TemperatureSummary`] for its range, so it can only be
/// requested once one exists.
pub struct Aggregator {
    work_group_size: usize,
    pool: rayon::ThreadPool,
    cancel: CancellationToken,
}

impl Aggregator {
    pub fn new(max_workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .thread_name(|index| format!("aggregate-{}", index))
            .build()
            .map_err(|e| ProcessingError::Execution {
                kernel: "thread pool".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            work_group_size: DEFAULT_WORK_GROUP_SIZE,
            pool,
            cancel: CancellationToken::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.max_workers)?.with_work_group_size(settings.work_group_size))
    }

    pub fn with_work_group_size(mut self, work_group_size: usize) -> Self {
        self.work_group_size = work_group_size;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels every pass started by this aggregator.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn work_group_size(&self) -> usize {
        self.work_group_size
    }

    fn reduction_engine(&self) -> Result<ReductionEngine> {
        Ok(ReductionEngine::new(self.work_group_size)?.with_cancellation(self.cancel.clone()))
    }

    fn histogram_engine(&self) -> Result<HistogramEngine> {
        Ok(HistogramEngine::new(self.work_group_size)?.with_cancellation(self.cancel.clone()))
    }

    /// Minimum, maximum and average of `temperatures`.
    pub fn summarize(&self, temperatures: &[i32]) -> Result<TemperatureSummary> {
        if temperatures.is_empty() {
            return Err(ProcessingError::empty("aggregation"));
        }

        let engine = self.reduction_engine()?;
        let ((min, max), sum) = self.pool.install(|| {
            rayon::join(
                || {
                    rayon::join(
                        || engine.reduce(temperatures, ReduceOp::Min),
                        || engine.reduce(temperatures, ReduceOp::Max),
                    )
                },
                || engine.reduce(temperatures, ReduceOp::Sum),
            )
        });

        let summary = TemperatureSummary::new(
            temperatures.len(),
            narrow(min?, ReduceOp::Min)?,
            narrow(max?, ReduceOp::Max)?,
            sum?,
        )?;

        debug!(
            count = summary.count,
            min = summary.min,
            max = summary.max,
            sum = summary.sum,
            "reduction passes complete"
        );
        Ok(summary)
    }

    /// Like [`summarize`](Self::summarize), but an empty set reports its line counts.
    pub fn summarize_set(&self, set: &ObservationSet) -> Result<TemperatureSummary> {
        set.require_records("aggregation")?;
        let summary = self.summarize(&set.temperatures)?;
        info!(
            records = summary.count,
            min = summary.min_degrees(),
            max = summary.max_degrees(),
            average = summary.average_degrees(),
            "temperature summary"
        );
        Ok(summary)
    }

    /// Histogram of `temperatures` over the range of `summary`.
    pub fn histogram(
        &self,
        temperatures: &[i32],
        summary: &TemperatureSummary,
        bins: usize,
    ) -> Result<Histogram> {
        let engine = self.histogram_engine()?;
        let histogram = self
            .pool
            .install(|| engine.compute(temperatures, bins, summary.min, summary.max))?;

        info!(bins, total = histogram.total(), "histogram complete");
        Ok(histogram)
    }

    /// Run a single named scalar kernel. The result is in tenths of a degree
    /// for every kernel except `sum`, which is the raw fixed-point total.
    pub fn run_kernel(&self, kernel: Kernel, temperatures: &[i32]) -> Result<f64> {
        let engine = self.reduction_engine()?;
        match kernel {
            Kernel::Reduce(op) => {
                let value = self.pool.install(|| engine.reduce(temperatures, op))?;
                Ok(value as f64)
            }
            Kernel::Average => self.pool.install(|| engine.average(temperatures)),
            Kernel::Histogram => Err(ProcessingError::Execution {
                kernel: kernel.name().to_string(),
                message: "the histogram kernel needs a bin count and a range; \
                          use the analyze command"
                    .to_string(),
            }),
        }
    }

    /// Per-month summaries for every month present in `set`.
    pub fn monthly(&self, set: &ObservationSet) -> Result<Vec<MonthlySummary>> {
        set.require_records("monthly breakdown")?;

        set.by_month()
            .into_iter()
            .map(|(month, temperatures)| {
                Ok(MonthlySummary {
                    month,
                    summary: self.summarize(&temperatures)?,
                })
            })
            .collect()
    }
}

/// Min and max of `i32` elements always fit back into `i32`.
fn narrow(value: i64, op: ReduceOp) -> Result<i32> {
    i32::try_from(value).map_err(|_| ProcessingError::Execution {
        kernel: op.kernel_name().to_string(),
        message: format!("result {} does not fit the element type", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;

    fn aggregator(work_group_size: usize) -> Aggregator {
        Aggregator::new(2).unwrap().with_work_group_size(work_group_size)
    }

    #[test]
    fn test_four_value_scenario() {
        let aggregator = aggregator(4);
        let temperatures = [10, 20, 30, 40];

        let summary = aggregator.summarize(&temperatures).unwrap();
        assert_eq!(summary.min, 10);
        assert_eq!(summary.max, 40);
        assert_eq!(summary.average, 25.0);

        let histogram = aggregator.histogram(&temperatures, &summary, 2).unwrap();
        assert_eq!(histogram.layout.width, 15.0);
        assert_eq!(histogram.counts, vec![2, 2]);
    }

    #[test]
    fn test_negative_data_with_padding() {
        // 5 values with group size 64: 59 padding elements per pass
        let aggregator = aggregator(64);
        let summary = aggregator.summarize(&[-52, -31, -77, -4, -19]).unwrap();
        assert_eq!(summary.min, -77);
        assert_eq!(summary.max, -4);
        assert_eq!(summary.sum, -183);
        assert_eq!(summary.average, -36.6);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let aggregator = aggregator(64);
        assert!(matches!(
            aggregator.summarize(&[]),
            Err(ProcessingError::EmptyInput { .. })
        ));
        assert!(matches!(
            aggregator.summarize_set(&ObservationSet::new()),
            Err(ProcessingError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_named_kernels() {
        let aggregator = aggregator(3);
        let temperatures = [15, -5, 40, 10];

        let run = |name: &str| aggregator.run_kernel(Kernel::from_name(name).unwrap(), &temperatures);
        assert_eq!(run("min").unwrap(), -5.0);
        assert_eq!(run("max").unwrap(), 40.0);
        assert_eq!(run("sum").unwrap(), 60.0);
        assert_eq!(run("average").unwrap(), 15.0);
        assert!(matches!(
            run("histogram"),
            Err(ProcessingError::Execution { .. })
        ));
    }

    #[test]
    fn test_monthly_breakdown() {
        let mut set = ObservationSet::new();
        for (month, temperature) in [(1, -20), (7, 210), (1, 10), (7, 190)] {
            set.push(&Observation::new("LINCOLN".to_string(), 1987, month, 1, 0, temperature));
        }

        let monthly = aggregator(64).monthly(&set).unwrap();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, 1);
        assert_eq!(monthly[0].summary.min, -20);
        assert_eq!(monthly[0].summary.average, -5.0);
        assert_eq!(monthly[1].month_name(), "July");
        assert_eq!(monthly[1].summary.max, 210);
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let aggregator = aggregator(2);
        aggregator.cancellation_token().cancel();
        assert!(matches!(
            aggregator.summarize(&[1, 2, 3]),
            Err(ProcessingError::Cancelled)
        ));
    }
}
