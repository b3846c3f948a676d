use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{FilterCriteria, FilterField};
use crate::settings::SettingsOverrides;

#[derive(Parser)]
#[command(name = "weather-aggregator")]
#[command(about = "Parallel temperature statistics for weather observation datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, JSON or YAML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide the progress spinner")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute min, max, average and a histogram of the temperature column
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(
            short,
            long,
            allow_hyphen_values = true,
            help = "Number of histogram bins (prompted for when absent or invalid)"
        )]
        bins: Option<String>,

        #[arg(
            short,
            long,
            num_args = 0..=1,
            help = "Write a JSON report [default: output/weather-stats-{YYMMDD}.json]"
        )]
        output: Option<Option<PathBuf>>,
    },

    /// Run a single named statistic kernel (min, max, sum, average)
    Reduce {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short, long)]
        kernel: String,
    },

    /// Summarise temperatures per calendar month
    Monthly {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(
            short,
            long,
            num_args = 0..=1,
            help = "Write a JSON report [default: output/weather-stats-{YYMMDD}.json]"
        )]
        output: Option<Option<PathBuf>>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(help = "Observation dataset (station year month day time temperature)")]
    pub input_file: PathBuf,

    #[arg(short = 'g', long, help = "Work-group size [default: 64]")]
    pub work_group_size: Option<usize>,

    #[arg(long, help = "Worker threads [default: number of CPUs]")]
    pub max_workers: Option<usize>,

    #[arg(short, long, help = "Field delimiter [default: space]")]
    pub delimiter: Option<char>,

    #[arg(long, help = "Memory-map the input file")]
    pub mmap: bool,
}

impl InputArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            work_group_size: self.work_group_size,
            max_workers: self.max_workers,
            delimiter: self.delimiter,
            use_mmap: self.mmap.then_some(true),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Only records from this station")]
    pub station: Option<String>,

    #[arg(long, help = "Only records from this year")]
    pub year: Option<String>,

    #[arg(long, help = "Only records from this month")]
    pub month: Option<String>,

    #[arg(long, help = "Only records from this day")]
    pub day: Option<String>,

    #[arg(long, help = "Only records at this time")]
    pub time: Option<String>,

    #[arg(short, long, help = "Prompt for each filter on stdin")]
    pub interactive: bool,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        let values = [&self.station, &self.year, &self.month, &self.day, &self.time];
        for (field, value) in FilterField::ALL.into_iter().zip(values) {
            if let Some(value) = value {
                criteria.set(field, value.as_str());
            }
        }
        criteria
    }
}
