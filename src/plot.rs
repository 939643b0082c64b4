//! PNG charts of an analysis, using the `plotters` crate
//!
//! The chart shows the historical prices, the forward predictions, and a shaded confidence band.
//! The x axis is the day index: history occupies `0..n`, predictions `n..n + horizon`.
use std::{ops::Range, path::Path};

use plotters::prelude::*;

use crate::{analysis::PredictionBundle, series::SeriesExt};

/// Default image size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1024, 640);

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>),

    /// Nothing to plot
    #[error("No historical data to plot")]
    Empty,
}

/// Renders `bundle` to a PNG file at `path`.
///
/// # Errors
/// Returns an error if the bundle has no history or the image cannot be drawn or written.
#[allow(clippy::cast_precision_loss)]
pub fn plot_bundle(bundle: &PredictionBundle, path: &Path, size: (u32, u32)) -> Result<(), Error> {
    if bundle.historical.is_empty() {
        return Err(Error::Empty);
    }

    let n = bundle.historical.len();
    let history: Vec<(f64, f64)> = bundle
        .historical
        .indices()
        .into_iter()
        .zip(bundle.historical.prices())
        .collect();

    // Joined to the last observation so the lines connect
    let last = history[n - 1];
    let predicted: Vec<(f64, f64)> = std::iter::once(last)
        .chain(
            bundle
                .predictions
                .iter()
                .enumerate()
                .map(|(k, p)| ((n + k) as f64, p.predicted_price)),
        )
        .collect();

    let band: Vec<(f64, f64)> = std::iter::once(last)
        .chain(
            bundle
                .predictions
                .iter()
                .enumerate()
                .map(|(k, p)| ((n + k) as f64, p.confidence_interval.upper)),
        )
        .chain(
            bundle
                .predictions
                .iter()
                .enumerate()
                .rev()
                .map(|(k, p)| ((n + k) as f64, p.confidence_interval.lower)),
        )
        .collect();

    let x_range = 0.0..(n + bundle.predictions.len()).max(2) as f64;
    let y_range = y_range(history.iter().chain(&band).map(|(_, y)| *y));

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!("{} ({})", bundle.symbol, bundle.model.kind());
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FontFamily::SansSerif, 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Day")
        .y_desc("Price")
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    chart.draw_series(std::iter::once(Polygon::new(band, BLUE.mix(0.15).filled())))?;

    chart
        .draw_series(LineSeries::new(history, BLACK.stroke_width(2)))?
        .label("Historical")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    let equation = bundle.model.to_string();
    chart
        .draw_series(LineSeries::new(predicted, BLUE.stroke_width(2)))?
        .label(format!("Predicted: {equation}"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    log::debug!("Wrote chart to {}", path.display());
    Ok(())
}

/// Min..max of the values with 5% padding, never below zero.
fn y_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad).max(0.0)..max + pad
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{analysis, AnalysisConfig, Observation};

    #[test]
    fn y_range_padding() {
        assert_eq!(y_range([10.0, 30.0].into_iter()), 9.0..31.0);
        assert_eq!(y_range([0.5, 100.5].into_iter()), 0.0..105.5);
        assert_eq!(y_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    #[ignore = "requires a system sans-serif font"]
    fn writes_png() {
        let config = AnalysisConfig {
            history_days: 40,
            horizon: 10,
            seed: Some(5),
            ..AnalysisConfig::default()
        };
        let analysis = analysis::run("NFLX", &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        plot_bundle(&analysis.bundle, &path, (320, 200)).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn empty_bundle() {
        let mut bundle = analysis::analyze(
            "X",
            &[
                Observation::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1.0),
                Observation::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 2.0),
            ],
            &AnalysisConfig::default(),
        )
        .unwrap()
        .bundle;
        bundle.historical.clear();

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            plot_bundle(&bundle, &dir.path().join("x.png"), DEFAULT_SIZE),
            Err(Error::Empty)
        ));
    }
}
