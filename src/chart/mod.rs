pub mod render;

use crate::error::ReportError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Axis scale. Logarithmic axes use base 2, like the worker counts they show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log2,
}

impl Scale {
    pub fn from_flag(log: bool) -> Self {
        if log {
            Scale::Log2
        } else {
            Scale::Linear
        }
    }

    /// Maps a data value to plot coordinates. `None` for values a log axis cannot show.
    pub fn project(&self, value: f64) -> Option<f64> {
        match self {
            Scale::Linear => Some(value),
            Scale::Log2 if value > 0.0 => Some(value.log2()),
            Scale::Log2 => None,
        }
    }

    /// Maps plot coordinates back to a data value.
    pub fn unproject(&self, coord: f64) -> f64 {
        match self {
            Scale::Linear => coord,
            Scale::Log2 => coord.exp2(),
        }
    }

    /// Tick label for a data value: integers when >= 1, one decimal otherwise.
    pub fn tick_label(&self, value: f64) -> String {
        match self {
            Scale::Log2 if value >= 1.0 => format!("{}", value.round() as i64),
            Scale::Log2 => format!("{:.1}", value),
            Scale::Linear if value.fract().abs() < 1e-9 => format!("{}", value as i64),
            Scale::Linear => format!("{:.2}", value),
        }
    }
}

/// A measured curve, drawn as a line with markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new<X: Into<f64> + Copy>(label: impl Into<String>, points: &[(X, f64)]) -> Self {
        Series {
            label: label.into(),
            points: points.iter().map(|&(x, y)| (x.into(), y)).collect(),
        }
    }
}

/// A dashed reference line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// Constant `y` across the whole x range (sequential time, ideal constant time).
    Horizontal { y: f64, label: String },
    /// `y = x` between `from` and `to` (ideal speedup).
    Identity { from: f64, to: f64, label: String },
}

impl Reference {
    pub fn label(&self) -> &str {
        match self {
            Reference::Horizontal { label, .. } | Reference::Identity { label, .. } => label,
        }
    }
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub references: Vec<Reference>,
    /// Custom x tick labels, keyed by data value.
    pub x_ticks: Vec<(f64, String)>,
}

impl Panel {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Panel {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
            references: Vec::new(),
            x_ticks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.references.is_empty()
    }

    /// Label to print under the x value `value`.
    pub fn x_tick_label(&self, value: f64, scale: Scale) -> String {
        self.x_ticks
            .iter()
            .find(|(x, _)| (x - value).abs() < 1e-6 * x.abs().max(1.0))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| scale.tick_label(value))
    }
}

/// A row of panels rendered into one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn single(panel: Panel) -> Self {
        Figure { panels: vec![panel] }
    }

    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(Panel::is_empty)
    }

    /// Overrides the title of a single-panel figure.
    pub fn with_title(mut self, title: Option<&str>) -> Self {
        if let (Some(title), [panel]) = (title, self.panels.as_mut_slice()) {
            panel.title = title.to_string();
        }
        self
    }
}

/// Cosmetic and output options shared by every chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub log_x: bool,
    pub log_y: bool,
    pub grid: bool,
    pub legend: bool,
    pub save: bool,
    pub save_path: Option<PathBuf>,
    /// Pixel size of one panel.
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            log_x: false,
            log_y: false,
            grid: false,
            legend: true,
            save: false,
            save_path: None,
            width: 800,
            height: 600,
        }
    }
}

impl ChartOptions {
    /// Requests saving to `path`.
    pub fn saved_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save = true;
        self.save_path = Some(path.into());
        self
    }

    /// Where the chart must be written, `None` when it is only displayed.
    pub fn destination(&self) -> Result<Option<&Path>, ReportError> {
        match (self.save, self.save_path.as_deref()) {
            (false, _) => Ok(None),
            (true, Some(path)) => Ok(Some(path)),
            (true, None) => Err(ReportError::MissingSavePath),
        }
    }
}

/// Saves `figure` to the requested destination, or prints it when no save is
/// requested.
///
/// The destination is validated before anything is drawn or written.
pub fn publish(figure: &Figure, options: &ChartOptions) -> Result<(), ReportError> {
    let destination = options.destination()?;

    if figure.is_empty() {
        log::warn!("Nothing to plot, skipping figure");
        return Ok(());
    }

    match destination {
        Some(path) => {
            render::save_png(figure, options, path)?;
            log::info!("Figure saved as {}", path.display());
        }
        None => crate::table::print_figure(figure),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_figure() -> Figure {
        let mut panel = Panel::new("Speedup", "Number of Threads", "Speedup");
        panel.series.push(Series::new("Chunk size 4", &[(1u32, 1.0), (2u32, 1.9)]));
        Figure::single(panel)
    }

    #[test]
    fn save_without_path_is_rejected_before_rendering() {
        let options = ChartOptions { save: true, ..ChartOptions::default() };

        let err = publish(&sample_figure(), &options).unwrap_err();
        assert!(matches!(err, ReportError::MissingSavePath));

        // Also rejected for figures with nothing to draw
        let err = publish(&Figure::default(), &options).unwrap_err();
        assert!(matches!(err, ReportError::MissingSavePath));
    }

    #[test]
    fn destination_follows_save_flag() {
        assert_eq!(ChartOptions::default().destination().unwrap(), None);
        let options = ChartOptions::default().saved_to("out.png");
        assert_eq!(options.destination().unwrap(), Some(Path::new("out.png")));
    }

    #[test]
    fn log_scale_round_trips_worker_counts() {
        let scale = Scale::Log2;
        assert_eq!(scale.project(8.0), Some(3.0));
        assert_eq!(scale.project(0.0), None);
        assert_eq!(scale.unproject(3.0), 8.0);
        assert_eq!(scale.tick_label(16.0), "16");
        assert_eq!(scale.tick_label(0.5), "0.5");
    }

    #[test]
    fn custom_ticks_take_precedence() {
        let mut panel = Panel::new("Weak", "Nodes", "Time");
        panel.x_ticks.push((2.0, "2 (2M)".to_string()));
        assert_eq!(panel.x_tick_label(2.0, Scale::Linear), "2 (2M)");
        assert_eq!(panel.x_tick_label(3.0, Scale::Linear), "3");
    }

    #[test]
    fn title_override_only_for_single_panels() {
        let figure = sample_figure().with_title(Some("Custom"));
        assert_eq!(figure.panels[0].title, "Custom");

        let mut two = sample_figure();
        two.panels.push(Panel::new("Other", "x", "y"));
        let two = two.with_title(Some("Custom"));
        assert_eq!(two.panels[0].title, "Speedup");
    }
}
