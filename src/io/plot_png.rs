use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{Result, SigvivalError};
use crate::survival::KmFigure;

pub const PLOT_WIDTH: u32 = 1000;
pub const PLOT_HEIGHT: u32 = 700;
const PLOT_MARGIN: u32 = 20;
const FONT_SIZE_TITLE: u32 = 24;
const CENSOR_TICK: i32 = 5;

fn draw_err<E: Display>(path: &Path) -> impl Fn(E) -> SigvivalError + '_ {
    move |e| SigvivalError::write_error(path.display().to_string(), e.to_string())
}

pub fn render_km_png(path: &Path, figure: &KmFigure) -> Result<()> {
    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err(path))?;

    let x_max = if figure.max_time > 0.0 {
        figure.max_time * 1.05
    } else {
        1.0
    };
    let mut chart = ChartBuilder::on(&root)
        .margin(PLOT_MARGIN)
        .caption(&figure.title, ("sans-serif", FONT_SIZE_TITLE))
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..1.05)
        .map_err(draw_err(path))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .draw()
        .map_err(draw_err(path))?;

    // legend heading, drawn as an empty series so it sits above the entries
    chart
        .draw_series(LineSeries::new(Vec::<(f64, f64)>::new(), &WHITE))
        .map_err(draw_err(path))?
        .label(figure.legend_title.as_str())
        .legend(|(x, y)| EmptyElement::at((x, y)));

    for (i, curve) in figure.curves.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(curve.path.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err(path))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x - 8, y), (x + 8, y)], color.stroke_width(2))
            });

        chart
            .draw_series(curve.censor_marks.iter().map(|&(t, s)| {
                EmptyElement::at((t, s))
                    + PathElement::new(vec![(0, -CENSOR_TICK), (0, CENSOR_TICK)], color)
            }))
            .map_err(draw_err(path))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err(path))?;

    root.present().map_err(draw_err(path))?;
    info!(path = %path.display(), curves = figure.curves.len(), "plot_written");
    Ok(())
}
