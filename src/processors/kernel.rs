use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::processors::reduction::ReduceOp;
use crate::utils::constants::{KERNEL_AVERAGE, KERNEL_HISTOGRAM, KERNEL_MAX, KERNEL_MIN, KERNEL_SUM};

/// A statistic pass addressed by its logical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Reduce(ReduceOp),
    Average,
    Histogram,
}

impl Kernel {
    pub const NAMES: [&'static str; 5] = [
        KERNEL_MIN,
        KERNEL_MAX,
        KERNEL_SUM,
        KERNEL_AVERAGE,
        KERNEL_HISTOGRAM,
    ];

    /// Resolve a kernel by name. Unknown names are an execution error, the
    /// same as asking a device program for a kernel it does not contain.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            KERNEL_MIN => Ok(Kernel::Reduce(ReduceOp::Min)),
            KERNEL_MAX => Ok(Kernel::Reduce(ReduceOp::Max)),
            KERNEL_SUM => Ok(Kernel::Reduce(ReduceOp::Sum)),
            KERNEL_AVERAGE => Ok(Kernel::Average),
            KERNEL_HISTOGRAM => Ok(Kernel::Histogram),
            _ => Err(ProcessingError::Execution {
                kernel: name.to_string(),
                message: format!("no such kernel; available: {}", Self::NAMES.join(", ")),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Reduce(op) => op.kernel_name(),
            Kernel::Average => KERNEL_AVERAGE,
            Kernel::Histogram => KERNEL_HISTOGRAM,
        }
    }
}

impl FromStr for Kernel {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
