use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::args::{Cli, Commands, FilterArgs};
use crate::error::Result;
use crate::models::{fixed_to_degrees, FilterCriteria, ObservationSet};
use crate::processors::{Aggregator, Kernel, ReduceOp};
use crate::readers::{ObservationReader, RecordParser};
use crate::settings::Settings;
use crate::utils::filename::generate_default_report_filename;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::utils::prompt::{prompt_filter_criteria, resolve_bin_count};
use crate::writers::{AggregateReport, ReportWriter};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let base_settings = Settings::load(cli.config.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Analyze {
            input,
            filters,
            bins,
            output,
        } => {
            let settings = base_settings.with_overrides(&input.overrides())?;
            let criteria = resolve_criteria(&filters)?;
            let set = read_observations(&input.input_file, &settings, criteria.clone(), quiet)?;

            let aggregator = Aggregator::from_settings(&settings)?;
            let summary = aggregator.summarize_set(&set)?;
            let writer = ReportWriter::new().with_bar_width(settings.bar_width);

            println!("{}", set.stats.summary());
            println!("{}", writer.render_summary(&summary));

            let configured_bins = settings.bins.map(|b| b.to_string());
            let candidate = bins.as_deref().or(configured_bins.as_deref());
            let bin_count = {
                let stdin = io::stdin();
                let mut input_lock = stdin.lock();
                let mut stdout = io::stdout();
                resolve_bin_count(candidate, &mut input_lock, &mut stdout)?
            };

            let histogram = aggregator.histogram(&set.temperatures, &summary, bin_count)?;
            println!("{}", writer.render_histogram(&histogram));

            if let Some(output) = output {
                let path = output.unwrap_or_else(generate_default_report_filename);
                let report = AggregateReport::new(
                    input.input_file.display().to_string(),
                    criteria,
                    aggregator.work_group_size(),
                    set.stats.clone(),
                    summary,
                )
                .with_histogram(histogram);

                writer.write_json(&report, &path)?;
                println!("Report written to {}", path.display());
            }
        }

        Commands::Reduce {
            input,
            filters,
            kernel,
        } => {
            let kernel = Kernel::from_name(&kernel)?;
            let settings = base_settings.with_overrides(&input.overrides())?;
            let criteria = resolve_criteria(&filters)?;
            let set = read_observations(&input.input_file, &settings, criteria, quiet)?;
            set.require_records("reduction")?;

            let aggregator = Aggregator::from_settings(&settings)?;
            let value = aggregator.run_kernel(kernel, &set.temperatures)?;
            info!(kernel = %kernel, value, "kernel complete");

            let degrees = fixed_to_degrees(value);
            match kernel {
                Kernel::Reduce(ReduceOp::Sum) => {
                    println!("{} = {:.1} over {} records", kernel, degrees, set.len())
                }
                Kernel::Average => println!("{} = {:.2}", kernel, degrees),
                _ => println!("{} = {:.1}", kernel, degrees),
            }
        }

        Commands::Monthly {
            input,
            filters,
            output,
        } => {
            let settings = base_settings.with_overrides(&input.overrides())?;
            let criteria = resolve_criteria(&filters)?;
            let set = read_observations(&input.input_file, &settings, criteria.clone(), quiet)?;

            let aggregator = Aggregator::from_settings(&settings)?;
            let summary = aggregator.summarize_set(&set)?;
            let monthly = aggregator.monthly(&set)?;
            let writer = ReportWriter::new().with_bar_width(settings.bar_width);

            let report = AggregateReport::new(
                input.input_file.display().to_string(),
                criteria,
                aggregator.work_group_size(),
                set.stats.clone(),
                summary,
            )
            .with_monthly(monthly);
            println!("{}", writer.render_report(&report));

            if let Some(output) = output {
                let path = output.unwrap_or_else(generate_default_report_filename);
                writer.write_json(&report, &path)?;
                println!("Report written to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Filter criteria from the flags, or from stdin when `--interactive` is set.
fn resolve_criteria(filters: &FilterArgs) -> Result<FilterCriteria> {
    let criteria = if filters.interactive {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();
        let criteria = prompt_filter_criteria(&mut input, &mut stdout)?;
        stdout.flush()?;
        criteria
    } else {
        filters.criteria()
    };

    debug!(criteria = %criteria, "filter criteria resolved");
    Ok(criteria)
}

fn read_observations(
    path: &Path,
    settings: &Settings,
    criteria: FilterCriteria,
    quiet: bool,
) -> Result<ObservationSet> {
    let progress = ProgressReporter::new_spinner("Reading observations...", quiet);

    let parser = RecordParser::new(criteria).with_delimiter(settings.delimiter);
    let reader = ObservationReader::new(parser).with_mmap(settings.use_mmap);
    let set = reader.read_path(path, Some(&progress))?;

    progress.finish_with_message(&format!(
        "Read {} lines, {} records matched",
        set.stats.lines_read, set.stats.records_matched
    ));
    Ok(set)
}

