use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (1280, 960);
/// Upper bound on points drawn per trace, longer traces are decimated.
const MAX_POINTS: usize = 4000;
const COLORS: [RGBColor; 5] = [BLUE, RED, GREEN, MAGENTA, CYAN];

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("failed to draw plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<std::io::Error>),
}

pub struct Trace<'a> {
    pub label: String,
    pub samples: &'a [f64],
}

pub struct Panel<'a> {
    pub title: String,
    pub traces: Vec<Trace<'a>>,
}

/// Panels for a run: original against each filtered signal for the first
/// two cases, then original against every filtered signal.
pub fn comparison_panels<'a>(original: &'a [f64], filtered: &'a [(String, Vec<f64>)]) -> Vec<Panel<'a>> {
    let original_trace = || Trace {
        label: "original signal".to_string(),
        samples: original,
    };
    let filtered_trace = |(title, samples): &'a (String, Vec<f64>)| Trace {
        label: format!("filtered {}", title),
        samples: samples.as_slice(),
    };

    let mut panels: Vec<Panel> = filtered
        .iter()
        .take(2)
        .map(|entry| Panel {
            title: entry.0.clone(),
            traces: vec![original_trace(), filtered_trace(entry)],
        })
        .collect();

    if let Some(last) = filtered.get(2) {
        let mut traces = vec![original_trace()];
        traces.extend(filtered.iter().map(filtered_trace));
        panels.push(Panel {
            title: last.0.clone(),
            traces,
        });
    }
    panels
}

/// Renders up to four panels on a 2x2 grid into an SVG file.
pub fn render<P: AsRef<Path>>(path: P, panels: &[Panel]) -> Result<(), PlotError> {
    let path = path.as_ref();
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels) {
        draw_panel(area, panel)?;
    }
    root.present()?;
    log::debug!("plot written to {}", path.display());
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend, Shift>, panel: &Panel) -> Result<(), PlotError> {
    let len = panel
        .traces
        .iter()
        .map(|t| t.samples.len())
        .max()
        .unwrap_or(0)
        .max(1);
    let (low, high) = bounds(panel);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0..len, low..high)?;
    chart.configure_mesh().draw()?;

    for (i, trace) in panel.traces.iter().enumerate() {
        let color = COLORS[i % COLORS.len()];
        let step = trace.samples.len().div_ceil(MAX_POINTS).max(1);
        chart
            .draw_series(LineSeries::new(
                trace
                    .samples
                    .iter()
                    .copied()
                    .enumerate()
                    .step_by(step)
                    .filter(|(_, s)| s.is_finite()),
                color,
            ))?
            .label(trace.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}

/// Vertical range covering every finite sample of the panel.
fn bounds(panel: &Panel) -> (f64, f64) {
    let (low, high) = panel
        .traces
        .iter()
        .flat_map(|t| t.samples.iter().copied())
        .filter(|s| s.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });
    if low > high {
        (-1.0, 1.0)
    } else if low == high {
        (low - 1.0, high + 1.0)
    } else {
        (low, high)
    }
}
