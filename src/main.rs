use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

use echofilter::cases::{self, Case};
use echofilter::pipeline::{self, OutputRate};
use echofilter::{audio, plot};

struct Config {
    input: PathBuf,
    out_dir: PathBuf,
    cases: Vec<Case>,
    plot: Option<PathBuf>,
    rate: OutputRate,
}

fn parse_args() -> Result<Config> {
    let matches = Command::new("echofilter")
        .version("0.1.0")
        .author("cuervo-blanco")
        .about("Applies zero-phase comb (echo) filters to a WAV signal")
        .arg(
            Arg::new("input")
                .help("Input WAV file")
                .value_parser(value_parser!(PathBuf))
                .default_value("audio.wav")
                .index(1),
        ).arg(
            Arg::new("out-dir")
                .help("Directory the filtered WAV files are written to")
                .long("out-dir")
                .short('d')
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
        ).arg(
            Arg::new("cases")
                .help("JSON file with a list of {delay_ms, alfa, output} cases")
                .long("cases")
                .short('c')
                .value_parser(value_parser!(PathBuf)),
        ).arg(
            Arg::new("plot")
                .help("SVG file the comparison plot is written to")
                .long("plot")
                .short('p')
                .value_parser(value_parser!(PathBuf))
                .default_value("comparison.svg"),
        ).arg(
            Arg::new("no-plot")
                .help("Skip rendering the comparison plot")
                .long("no-plot")
                .action(ArgAction::SetTrue)
                .conflicts_with("plot"),
        ).arg(
            Arg::new("keep-rate")
                .help("Label output files with the input sample rate instead of 44100 Hz")
                .long("keep-rate")
                .action(ArgAction::SetTrue),
        ).get_matches();

    let path_arg = |id: &str| {
        matches
            .get_one::<PathBuf>(id)
            .cloned()
            .with_context(|| format!("missing argument '{}'", id))
    };

    let cases = match matches.get_one::<PathBuf>("cases") {
        Some(path) => cases::load_cases(path)?,
        None => cases::default_cases(),
    };
    let plot = if matches.get_flag("no-plot") {
        None
    } else {
        Some(path_arg("plot")?)
    };
    let rate = if matches.get_flag("keep-rate") {
        OutputRate::Input
    } else {
        OutputRate::default()
    };

    Ok(Config {
        input: path_arg("input")?,
        out_dir: path_arg("out-dir")?,
        cases,
        plot,
        rate,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let config = parse_args()?;

    let mut filtered = Vec::with_capacity(config.cases.len());
    for (index, case) in config.cases.iter().enumerate() {
        let output = pipeline::run_case(&config.input, &config.out_dir, index, case, config.rate)
            .with_context(|| format!("case {} ({}ms, alfa={})", index + 1, case.delay_ms, case.alfa))?;
        println!("{}", case.describe(&case.output_name(index)));
        filtered.push((case.title(), output.samples));
    }

    if let Some(plot_path) = &config.plot {
        let original = audio::read(&config.input)?;
        let panels = plot::comparison_panels(&original.samples, &filtered);
        plot::render(plot_path, &panels)
            .with_context(|| format!("failed to render {}", plot_path.display()))?;
    }
    Ok(())
}
