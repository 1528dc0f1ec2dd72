use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{
    AxisHints, Bar, BarChart, HPlacement, Legend, Line, Plot, PlotBounds, PlotPoints, Points,
};

use crate::color::{muted, series_color};
use crate::data::model::{SummaryField, YearlySummary};
use crate::scene::{Scene, SceneData};
use crate::state::AppState;

/// Humidity axis runs 0–100 %, wind speed axis 0–50 m/s; wind bars are
/// drawn in humidity units and relabelled on the right axis.
const HUMIDITY_MAX: f64 = 100.0;
const WIND_MAX: f64 = 50.0;
const WIND_SCALE: f64 = HUMIDITY_MAX / WIND_MAX;
const MAX_ZOOM: f64 = 5.0;

// ---------------------------------------------------------------------------
// Chart for the current scene (central panel)
// ---------------------------------------------------------------------------

/// Render the current scene's chart, or a placeholder while there is none.
pub fn scene_chart(ui: &mut Ui, state: &mut AppState) {
    let temperature = state.temperature;
    let Some(data) = state.chart.as_ref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading() {
                ui.spinner();
            } else {
                ui.label("No chart to show.");
            }
        });
        return;
    };

    if data.summaries.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No valid rows for this scene.");
        });
        return;
    }

    // Toggles need `&mut state`, so they run before the chart data is borrowed.
    if data.scene == Scene::ClimateFactors {
        series_toggles(ui, state);
    }
    let visible = visible_series(|field| state.is_visible(field));

    let Some(data) = state.chart.as_ref() else {
        return;
    };
    match data.scene {
        Scene::Introduction => line_chart(ui, data, SummaryField::AvgTemp, true),
        Scene::TemperatureDetails => line_chart(ui, data, temperature.field(), false),
        Scene::Precipitation => precipitation_chart(ui, data),
        Scene::ClimateFactors => climate_factors_chart(ui, data, &visible),
    }
}

fn year_axis(mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

/// Points of `field`, skipping years where it has no value.
fn series(summaries: &[YearlySummary], field: SummaryField) -> Vec<[f64; 2]> {
    summaries
        .iter()
        .filter_map(|s| Some([s.year as f64, s.get(field)?]))
        .collect()
}

// ---------------------------------------------------------------------------
// Line charts (scenes 1 and 2)
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, data: &SceneData, field: SummaryField, from_zero: bool) {
    let points = series(&data.summaries, field);
    let color = series_color(field);
    let name = field.label();

    let mut plot = Plot::new(("line_chart", data.scene.number()))
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(name)
        .x_axis_formatter(year_axis)
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!("Year: {:.0}\n{name}: {:.2}", value.x, value.y)
            }
        })
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false);
    if from_zero {
        plot = plot.include_y(0.0);
    }

    plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name(name)
                .color(color)
                .width(1.5),
        );
        if from_zero {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name(name)
                    .color(color)
                    .radius(5.0),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Bar chart (scene 3)
// ---------------------------------------------------------------------------

fn precipitation_chart(ui: &mut Ui, data: &SceneData) {
    let field = SummaryField::Total;
    let bars: Vec<Bar> = series(&data.summaries, field)
        .into_iter()
        .map(|[year, total]| Bar::new(year, total).width(0.9))
        .collect();

    let chart = BarChart::new(bars)
        .name(field.label())
        .color(series_color(field))
        .element_formatter(Box::new(|bar, _chart| {
            format!(
                "Year: {:.0}\nPrecipitation: {:.2} mm",
                bar.argument, bar.value
            )
        }));

    Plot::new("precipitation_chart")
        .x_axis_label("Year")
        .y_axis_label(field.label())
        .x_axis_formatter(year_axis)
        .include_y(0.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Dual-axis grouped bars with legend toggles (scene 4)
// ---------------------------------------------------------------------------

/// Series of the climate factors chart, in legend order.
const CLIMATE_SERIES: [SummaryField; 2] = [SummaryField::AvgHumidity, SummaryField::AvgWindSpeed];

/// The climate series that pass `is_visible`, in legend order.
fn visible_series(is_visible: impl Fn(SummaryField) -> bool) -> Vec<SummaryField> {
    CLIMATE_SERIES.into_iter().filter(|f| is_visible(*f)).collect()
}

/// Clickable legend entries; a click shows or hides the series.
fn series_toggles(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for field in CLIMATE_SERIES {
            let visible = state.is_visible(field);
            let color = if visible {
                series_color(field)
            } else {
                muted(series_color(field))
            };
            let label = RichText::new(format!("■ {}", legend_name(field))).color(color);
            if ui
                .add(egui::Button::new(label).frame(false))
                .on_hover_text("Click to show or hide")
                .clicked()
            {
                state.toggle_series(field);
            }
        }
    });
}

fn climate_factors_chart(ui: &mut Ui, data: &SceneData, visible: &[SummaryField]) {
    let first = data.summaries.first().map_or(0.0, |s| s.year as f64);
    let last = data.summaries.last().map_or(0.0, |s| s.year as f64);
    let full = [first - 0.5, last + 0.5, 0.0, HUMIDITY_MAX];

    let charts: Vec<BarChart> = visible
        .iter()
        .map(|&field| match field {
            SummaryField::AvgWindSpeed => grouped_bars(data, field, 0.2, WIND_SCALE),
            _ => grouped_bars(data, field, -0.2, 1.0),
        })
        .collect();

    let axes = vec![
        AxisHints::new_y().label("Humidity (%)"),
        AxisHints::new_y()
            .label("Wind Speed (m/s)")
            .placement(HPlacement::Right)
            .formatter(|mark, _range| format!("{:.0}", mark.value / WIND_SCALE)),
    ];

    Plot::new("climate_factors_chart")
        .x_axis_label("Year")
        .x_axis_formatter(year_axis)
        .custom_y_axes(axes)
        .include_x(full[0])
        .include_x(full[1])
        .include_y(full[2])
        .include_y(full[3])
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            let b = plot_ui.plot_bounds();
            if b.is_valid() {
                let current = [b.min()[0], b.max()[0], b.min()[1], b.max()[1]];
                let [x0, x1, y0, y1] = constrain_view(current, full, MAX_ZOOM);
                if [x0, x1, y0, y1] != current {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));
                }
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn legend_name(field: SummaryField) -> &'static str {
    match field {
        SummaryField::AvgWindSpeed => "Wind Speed",
        SummaryField::AvgHumidity => "Humidity",
        other => other.label(),
    }
}

/// Half-width bars for one series, offset from the year and scaled into
/// humidity units.
fn grouped_bars(data: &SceneData, field: SummaryField, offset: f64, scale: f64) -> BarChart {
    let color: Color32 = series_color(field);
    let bars: Vec<Bar> = series(&data.summaries, field)
        .into_iter()
        .map(|[year, value]| Bar::new(year + offset, value * scale).width(0.4))
        .collect();

    let name = legend_name(field);
    let unit = if field == SummaryField::AvgWindSpeed { "m/s" } else { "%" };
    BarChart::new(bars)
        .name(name)
        .color(color)
        .element_formatter(Box::new(move |bar, _chart| {
            format!(
                "Year: {:.0}\n{name}: {:.2} {unit}",
                bar.argument - offset,
                bar.value / scale
            )
        }))
}

/// Keep a `[min_x, max_x, min_y, max_y]` view inside `full`, zoomed in at
/// most `max_zoom` times and never zoomed out past `full`.
pub fn constrain_view(view: [f64; 4], full: [f64; 4], max_zoom: f64) -> [f64; 4] {
    let axis = |lo: f64, hi: f64, full_lo: f64, full_hi: f64| {
        let full_span = full_hi - full_lo;
        let span = (hi - lo).clamp(full_span / max_zoom, full_span);
        let center = (lo + hi) / 2.0;
        let start = (center - span / 2.0).min(full_hi - span).max(full_lo);
        (start, start + span)
    };
    let (x0, x1) = axis(view[0], view[1], full[0], full[1]);
    let (y0, y1) = axis(view[2], view[3], full[2], full[3]);
    [x0, x1, y0, y1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_view_keeps_valid_view() {
        let full = [1999.5, 2010.5, 0.0, 100.0];
        let view = [2001.0, 2005.0, 10.0, 60.0];
        assert_eq!(constrain_view(view, full, 5.0), view);
    }

    #[test]
    fn test_constrain_view_limits_zoom_out_and_pan() {
        let full = [0.0, 10.0, 0.0, 100.0];
        assert_eq!(constrain_view([-20.0, 30.0, -50.0, 150.0], full, 5.0), full);
        assert_eq!(
            constrain_view([8.0, 12.0, 0.0, 100.0], full, 5.0),
            [6.0, 10.0, 0.0, 100.0]
        );
    }

    #[test]
    fn test_constrain_view_limits_zoom_in() {
        let full = [0.0, 10.0, 0.0, 100.0];
        let [x0, x1, y0, y1] = constrain_view([4.9, 5.1, 40.0, 41.0], full, 5.0);
        assert!((x1 - x0 - 2.0).abs() < 1e-9);
        assert!((y1 - y0 - 20.0).abs() < 1e-9);
        assert!((x0 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_visible_series_keeps_legend_order() {
        assert_eq!(visible_series(|_| true), CLIMATE_SERIES.to_vec());
        assert_eq!(
            visible_series(|f| f != SummaryField::AvgHumidity),
            vec![SummaryField::AvgWindSpeed]
        );
        assert!(visible_series(|_| false).is_empty());
    }

    #[test]
    fn test_series_skips_missing_years() {
        let mut a = YearlySummary::new(2000);
        a.fields.insert(SummaryField::MinTemp, Some(-3.0));
        let mut b = YearlySummary::new(2001);
        b.fields.insert(SummaryField::MinTemp, None);
        assert_eq!(series(&[a, b], SummaryField::MinTemp), vec![[2000.0, -3.0]]);
    }
}
