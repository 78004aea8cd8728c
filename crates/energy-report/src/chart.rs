//! Dashboard chart: one daily consumption line per building, as SVG.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use energy_core::error::{EnergyError, Result};
use energy_core::models::DailyTotal;
use plotters::prelude::*;

const TITLE: &str = "Daily Energy Consumption - Campus";
const SIZE: (u32, u32) = (1000, 500);

/// Daily series per building, with days lacking readings filled with zero.
///
/// Each series runs from the building's first to its last reading day.
pub fn daily_series(daily: &[DailyTotal]) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut by_building: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for row in daily {
        *by_building
            .entry(row.building.clone())
            .or_default()
            .entry(row.date)
            .or_insert(0.0) += row.kwh;
    }

    by_building
        .into_iter()
        .map(|(building, days)| {
            let mut points = Vec::with_capacity(days.len());
            if let (Some(&first), Some(&last)) = (days.keys().next(), days.keys().next_back()) {
                let mut day = first;
                while day <= last {
                    points.push((day, days.get(&day).copied().unwrap_or(0.0)));
                    match day.succ_opt() {
                        Some(next) => day = next,
                        None => break,
                    }
                }
            }
            (building, points)
        })
        .collect()
}

/// Draw the dashboard chart for `daily` into an SVG file at `path`.
///
/// Non-finite totals (an `inf` reading, say) are left out of the plot and
/// of the axis range.
pub fn render_dashboard(path: &Path, daily: &[DailyTotal]) -> Result<()> {
    let series = daily_series(daily);

    let first = daily.iter().map(|d| d.date).min();
    let last = daily.iter().map(|d| d.date).max();
    let (Some(start), Some(last)) = (first, last) else {
        return Err(EnergyError::Chart("no daily totals to plot".to_string()));
    };
    let end = last.succ_opt().unwrap_or(last);

    let values = series
        .values()
        .flatten()
        .map(|&(_, kwh)| kwh)
        .filter(|kwh| kwh.is_finite());
    let y_max = values.clone().fold(0.0_f64, f64::max);
    let y_min = values.fold(0.0_f64, f64::min);
    let y_top = if y_max > 0.0 { (y_max * 1.1).min(f64::MAX) } else { 1.0 };

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(start..end, y_min..y_top)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Days")
        .y_desc("kWh Usage")
        .draw()
        .map_err(chart_err)?;

    for (idx, (building, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                points.iter().copied().filter(|(_, kwh)| kwh.is_finite()),
                color.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(building.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn chart_err<E: std::fmt::Display>(err: E) -> EnergyError {
    EnergyError::Chart(err.to_string())
}
