//! Trend panel: the selected metric's long sample window.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::charts::history_chart;
use crate::history::{HistoryMetric, HistoryStore};

pub fn draw_history(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    store: &HistoryStore,
    metric: HistoryMetric,
) {
    let title = format!("History: {} (press 'm' to switch)", metric.label());
    let block = Block::default().borders(Borders::ALL).title(title);
    let buffer = store.buffer(metric);
    if buffer.is_empty() {
        f.render_widget(block, area);
        return;
    }

    let input = history_chart(buffer, metric);
    let points: Vec<(f64, f64)> = input.series[0]
        .points
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    // Percent metrics fit in 0..100; scale up when a series (temperature)
    // ever exceeds it.
    let peak = input
        .series[0]
        .points
        .iter()
        .cloned()
        .fold(0.0_f64, f64::max);
    let y_max = peak.max(100.0);

    let datasets = vec![Dataset::default()
        .name(input.series[0].name.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points)];

    let x_labels = match (input.labels.first(), input.labels.last()) {
        (Some(first), Some(last)) if input.labels.len() > 1 => {
            vec![first.clone(), last.clone()]
        }
        (Some(only), _) => vec![only.clone()],
        _ => Vec::new(),
    };
    let x_max = (input.labels.len().saturating_sub(1)).max(1) as f64;

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(Axis::default().bounds([0.0, y_max]).labels(vec![
            "0".to_string(),
            format!("{:.0}", y_max / 2.0),
            format!("{y_max:.0}"),
        ]));
    f.render_widget(chart, area);
}
