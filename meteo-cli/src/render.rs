use meteo_core::{
    ViewModel,
    view::{ForecastSection, LineChart, Metric},
};
use std::fmt;

const BAR_WIDTH: usize = 20;

/// Plain-text rendering of a view model.
pub struct TextView<'a>(pub &'a ViewModel);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let c = &view.current;
        writeln!(f, "== {} ==", c.place)?;
        writeln!(f, "{}  {}", c.temperature, c.description)?;
        writeln!(f, "{}   {}", c.max_temp, c.min_temp)?;
        writeln!(f, "{}", c.observed_at)?;
        writeln!(f, "{}", c.coordinates)?;
        writeln!(f, "Sunrise: {}   Sunset: {}", c.sunrise, c.sunset)?;
        writeln!(f)?;

        let h = &view.highlights;
        for metric in [&h.humidity, &h.visibility, &h.wind_direction, &h.wind_speed] {
            write_metric(f, metric)?;
        }
        writeln!(f)?;

        write_chart(f, &view.history_chart)?;
        writeln!(f)?;

        match &view.forecast {
            ForecastSection::Available(forecast) => {
                writeln!(f, "{}", forecast.heading)?;
                writeln!(f, "{}", forecast.table.columns.join(" | "))?;
                for row in &forecast.table.rows {
                    writeln!(f, "{}", row.join(" | "))?;
                }
            }
            ForecastSection::Unavailable { warning, .. } => {
                writeln!(f, "! {warning}")?;
            }
        }

        Ok(())
    }
}

fn write_metric(f: &mut fmt::Formatter<'_>, metric: &Metric) -> fmt::Result {
    match metric.progress {
        Some(pct) => writeln!(f, "{:<11} {:>10}  {}", metric.label, metric.value, bar(pct)),
        None => writeln!(f, "{:<11} {:>10}", metric.label, metric.value),
    }
}

fn write_chart(f: &mut fmt::Formatter<'_>, chart: &LineChart) -> fmt::Result {
    writeln!(f, "{}", chart.title)?;
    for point in &chart.points {
        writeln!(f, "  {}  {:>6.1}", point.time.format("%Y-%m-%d %H:%M"), point.temperature)?;
    }
    Ok(())
}

fn bar(pct: u8) -> String {
    let filled = usize::from(pct.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}] {pct}%", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
