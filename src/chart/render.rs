use crate::chart::{ChartOptions, Figure, Panel, Reference, Scale};
use crate::error::ReportError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::Path;

const CAPTION_FONT_SIZE: u32 = 22;
const LABEL_FONT_SIZE: u32 = 16;
const DEFAULT_LABEL_COUNT: usize = 10;

/// Points sampled along a reference line; consecutive pairs become dashes.
const REFERENCE_SAMPLES: usize = 40;

fn plot_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Plot(e.to_string())
}

/// Lower and upper bound of `values`.
fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Adds a 5% margin around `(min, max)`.
fn padded((min, max): (f64, f64)) -> Range<f64> {
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Number of tick labels; on log axes one per power of two.
fn label_count(range: &Range<f64>, scale: Scale) -> usize {
    match scale {
        Scale::Linear => DEFAULT_LABEL_COUNT,
        Scale::Log2 => ((range.end - range.start).ceil() as usize + 1).clamp(2, DEFAULT_LABEL_COUNT * 2),
    }
}

/// A panel projected into plot coordinates.
struct PanelLayout {
    series: Vec<(String, Vec<(f64, f64)>)>,
    references: Vec<(String, Vec<(f64, f64)>)>,
    x: Range<f64>,
    y: Range<f64>,
}

impl PanelLayout {
    fn new(panel: &Panel, x_scale: Scale, y_scale: Scale) -> Self {
        // Project measured points, dropping what a log axis cannot show
        let series: Vec<(String, Vec<(f64, f64)>)> = panel
            .series
            .iter()
            .map(|s| {
                let points: Vec<(f64, f64)> = s
                    .points
                    .iter()
                    .filter_map(|&(x, y)| Some((x_scale.project(x)?, y_scale.project(y)?)))
                    .collect();
                if points.len() < s.points.len() {
                    log::warn!("'{}': dropped non-positive values on a log axis", s.label);
                }
                (s.label.clone(), points)
            })
            .collect();

        // The x span comes from the data, or from identity lines when there is none
        let x_span = extent(series.iter().flat_map(|(_, p)| p.iter().map(|&(x, _)| x)))
            .or_else(|| {
                extent(panel.references.iter().flat_map(|r| match r {
                    Reference::Identity { from, to, .. } => vec![*from, *to],
                    Reference::Horizontal { .. } => Vec::new(),
                }).filter_map(|v| x_scale.project(v)))
            })
            .unwrap_or((0.0, 1.0));

        let references: Vec<(String, Vec<(f64, f64)>)> = panel
            .references
            .iter()
            .map(|r| (r.label().to_string(), reference_points(r, x_span, x_scale, y_scale)))
            .filter(|(_, points)| points.len() >= 2)
            .collect();

        let y_span = extent(
            series
                .iter()
                .chain(references.iter())
                .flat_map(|(_, p)| p.iter().map(|&(_, y)| y)),
        )
        .unwrap_or((0.0, 1.0));

        PanelLayout {
            series,
            references,
            x: padded(x_span),
            y: padded(y_span),
        }
    }

    /// Legend goes where the first curve is not heading.
    fn legend_position(&self) -> SeriesLabelPosition {
        let rising = self
            .series
            .first()
            .and_then(|(_, p)| Some(p.last()?.1 > p.first()?.1))
            .unwrap_or(false);
        if rising {
            SeriesLabelPosition::UpperLeft
        } else {
            SeriesLabelPosition::UpperRight
        }
    }
}

/// Samples a reference line in plot coordinates.
fn reference_points(reference: &Reference, (x0, x1): (f64, f64), x_scale: Scale, y_scale: Scale) -> Vec<(f64, f64)> {
    let (start, end) = match reference {
        Reference::Horizontal { .. } => (x0, x1),
        Reference::Identity { from, to, .. } => match (x_scale.project(*from), x_scale.project(*to)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Vec::new(),
        },
    };

    (0..=REFERENCE_SAMPLES)
        .filter_map(|i| {
            let px = start + (end - start) * i as f64 / REFERENCE_SAMPLES as f64;
            let y = match reference {
                Reference::Horizontal { y, .. } => *y,
                Reference::Identity { .. } => x_scale.unproject(px),
            };
            Some((px, y_scale.project(y)?))
        })
        .collect()
}

/// Writes `figure` as a PNG, one drawing area per panel laid out in a row.
pub fn save_png(figure: &Figure, options: &ChartOptions, path: &Path) -> Result<(), ReportError> {
    // Create the output directory if needed
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let columns = figure.panels.len().max(1);
    let root = BitMapBackend::new(path, (options.width * columns as u32, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let areas = root.split_evenly((1, columns));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        if panel.is_empty() {
            log::warn!("Panel '{}' has no data, leaving it blank", panel.title);
            continue;
        }
        draw_panel(area, panel, options)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, panel: &Panel, options: &ChartOptions) -> Result<(), ReportError> {
    let x_scale = Scale::from_flag(options.log_x);
    let y_scale = Scale::from_flag(options.log_y);
    let layout = PanelLayout::new(panel, x_scale, y_scale);

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .caption(panel.title.as_str(), ("sans-serif", CAPTION_FONT_SIZE))
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(layout.x.clone(), layout.y.clone())
        .map_err(plot_err)?;

    // Axes, labels and optional grid
    let x_formatter = |v: &f64| panel.x_tick_label(x_scale.unproject(*v), x_scale);
    let y_formatter = |v: &f64| y_scale.tick_label(y_scale.unproject(*v));
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .x_labels(label_count(&layout.x, x_scale))
            .y_labels(label_count(&layout.y, y_scale))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .axis_desc_style(("sans-serif", LABEL_FONT_SIZE));
        if !options.grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(plot_err)?;
    }

    // Measured series: line plus circle markers
    for (idx, (label, points)) in layout.series.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
            .map_err(plot_err)?;
    }

    // Reference lines, dashed red
    for (label, points) in &layout.references {
        let dashes = points.chunks_exact(2).map(|dash| PathElement::new(dash.to_vec(), RED.stroke_width(2)));
        chart
            .draw_series(dashes)
            .map_err(plot_err)?
            .label(label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    if options.legend {
        chart
            .configure_series_labels()
            .position(layout.legend_position())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LABEL_FONT_SIZE))
            .draw()
            .map_err(plot_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Series;

    #[test]
    fn identity_reference_follows_log_axes() {
        let reference = Reference::Identity { from: 1.0, to: 16.0, label: "Ideal".into() };
        let points = reference_points(&reference, (0.0, 4.0), Scale::Log2, Scale::Log2);
        assert_eq!(points.len(), REFERENCE_SAMPLES + 1);
        assert_eq!(points.first(), Some(&(0.0, 0.0)));
        let last = points.last().unwrap();
        assert!((last.0 - 4.0).abs() < 1e-9 && (last.1 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn horizontal_reference_spans_the_data() {
        let mut panel = Panel::new("Time", "Threads", "Seconds");
        panel.series.push(Series::new("run", &[(1u32, 10.0), (8u32, 2.0)]));
        panel.references.push(Reference::Horizontal { y: 18.0, label: "Sequential Time".into() });

        let layout = PanelLayout::new(&panel, Scale::Linear, Scale::Linear);
        let (_, line) = &layout.references[0];
        assert_eq!(line.first(), Some(&(1.0, 18.0)));
        assert_eq!(line.last(), Some(&(8.0, 18.0)));
        assert!(layout.y.end > 18.0 && layout.y.start < 2.0);
        assert!(matches!(layout.legend_position(), SeriesLabelPosition::UpperRight));
    }

    #[test]
    fn flat_extents_get_a_margin() {
        let range = padded((3.0, 3.0));
        assert!(range.start < 3.0 && range.end > 3.0);
    }
}
