use crate::audio::{self, OutputFormat, Signal};
use crate::cases::Case;
use crate::filter::CombFilter;
use crate::Error;
use std::path::{Path, PathBuf};

/// Which sample rate the filtered files are labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRate {
    /// Always this rate, whatever the input was recorded at.
    Fixed(u32),
    /// The input file's own rate.
    Input,
}

impl Default for OutputRate {
    fn default() -> Self {
        OutputRate::Fixed(audio::OUTPUT_SAMPLE_RATE)
    }
}

impl OutputRate {
    fn format_for(&self, signal: &Signal) -> OutputFormat {
        match *self {
            OutputRate::Fixed(sample_rate) => {
                if sample_rate != signal.sample_rate {
                    log::warn!(
                        "input is {} Hz but output is labelled {} Hz, playback speed will differ (use --keep-rate to keep the input rate)",
                        signal.sample_rate,
                        sample_rate
                    );
                }
                OutputFormat { sample_rate }
            }
            OutputRate::Input => OutputFormat {
                sample_rate: signal.sample_rate,
            },
        }
    }
}

/// Result of one case: where it was written and the filtered samples.
#[derive(Debug, Clone)]
pub struct CaseOutput {
    pub case: Case,
    pub delay: usize,
    pub path: PathBuf,
    pub samples: Vec<f64>,
}

/// Loads `input`, filters it with the case's parameters and writes the
/// result under `out_dir`.
pub fn run_case(
    input: &Path,
    out_dir: &Path,
    index: usize,
    case: &Case,
    rate: OutputRate,
) -> Result<CaseOutput, Error> {
    let (k, signal) = audio::load(input, case.delay_ms)?;
    let filter = CombFilter::new(k, case.alfa);
    log::trace!("case {}: k={} alfa={}", index + 1, filter.delay(), filter.alfa());
    let samples = filter.apply(&signal.samples)?;

    let path = out_dir.join(case.output_name(index));
    audio::write(&path, &samples, rate.format_for(&signal))?;

    Ok(CaseOutput {
        case: case.clone(),
        delay: k,
        path,
        samples,
    })
}
