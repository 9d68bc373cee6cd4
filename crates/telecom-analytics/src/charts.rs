//! Chart rendering with Charming (ECharts wrapper).
//!
//! Charts are built as plain [`Chart`] values and written out as standalone
//! HTML pages.

use crate::error::{AnalyticsError, Result};
use crate::queries::{RegionProfit, RevenuePivot};
use charming::{
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, Tooltip, Trigger},
    series::{Bar, Line},
    Chart, HtmlRenderer,
};
use std::path::Path;
use tracing::debug;

const CHART_WIDTH: u64 = 1000;
const CHART_HEIGHT: u64 = 600;

/// Title of the revenue trend chart for the pivot's year span.
pub fn revenue_trend_title(pivot: &RevenuePivot) -> String {
    match pivot.year_span() {
        Some((first, last)) => format!("Revenue Trend ({first}-{last})"),
        None => "Revenue Trend".to_string(),
    }
}

/// Line chart of revenue over years, one line per company.
pub fn revenue_trend_chart(pivot: &RevenuePivot) -> Chart {
    let legend: Vec<&str> = pivot.companies.iter().map(String::as_str).collect();

    let mut x_axis = Axis::new().type_(AxisType::Value).name("Year");
    if let Some((first, last)) = pivot.year_span() {
        x_axis = x_axis.min(f64::from(first)).max(f64::from(last));
    }

    let mut chart = Chart::new()
        .title(Title::new().text(revenue_trend_title(pivot)).left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().data(legend).bottom(0))
        .grid(Grid::new().left("10%").right("10%").top("15%").bottom("15%"))
        .x_axis(x_axis)
        .y_axis(Axis::new().type_(AxisType::Value).name("Revenue"));

    for company in &pivot.companies {
        let points: Vec<Vec<f64>> = pivot
            .company_series(company)
            .into_iter()
            .map(|(year, revenue)| vec![f64::from(year), revenue])
            .collect();
        chart = chart.series(Line::new().name(company.as_str()).data(points));
    }

    chart
}

/// Bar chart of total profit per region.
pub fn profit_by_region_chart(regions: &[RegionProfit]) -> Chart {
    let names: Vec<String> = regions.iter().map(|r| r.region.clone()).collect();
    let totals: Vec<f64> = regions.iter().map(|r| r.total_profit).collect();

    Chart::new()
        .title(Title::new().text("Profit by Region").left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(Grid::new().left("10%").right("10%").top("15%").bottom("15%"))
        .x_axis(Axis::new().type_(AxisType::Category).name("Region").data(names))
        .y_axis(Axis::new().type_(AxisType::Value).name("Total Profit"))
        .series(Bar::new().name("Total Profit").data(totals))
}

/// Render a chart to a standalone HTML document.
pub fn render_html(chart: &Chart, title: &str) -> Result<String> {
    HtmlRenderer::new(title, CHART_WIDTH, CHART_HEIGHT)
        .render(chart)
        .map_err(|e| AnalyticsError::Chart(format!("{e:?}")))
}

/// Render a chart and write it to `path`.
pub fn save_chart<P: AsRef<Path>>(chart: &Chart, path: P, title: &str) -> Result<()> {
    let html = render_html(chart, title)?;
    std::fs::write(path.as_ref(), html)?;
    debug!(path = %path.as_ref().display(), title, "Chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::seeded_engine;

    #[test]
    fn test_revenue_trend_title() {
        let pivot = seeded_engine().revenue_pivot().unwrap();
        assert_eq!(revenue_trend_title(&pivot), "Revenue Trend (2016-2018)");
        assert_eq!(revenue_trend_title(&RevenuePivot::default()), "Revenue Trend");
    }

    #[test]
    fn test_revenue_chart_html() {
        let pivot = seeded_engine().revenue_pivot().unwrap();
        let chart = revenue_trend_chart(&pivot);
        let html = render_html(&chart, "Revenue").unwrap();
        assert!(html.contains("Revenue Trend (2016-2018)"));
        assert!(html.contains("Telecom_A"));
        assert!(html.contains("Telecom_B"));
    }

    #[test]
    fn test_profit_chart_saved() {
        let engine = seeded_engine();
        let chart = profit_by_region_chart(&engine.profit_by_region().unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profit.html");
        save_chart(&chart, &path, "Profit by Region").unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Profit by Region"));
        assert!(html.contains("North"));
    }
}
