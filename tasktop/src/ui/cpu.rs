//! Live CPU chart: usage and temperature lines over the short window.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::charts::cpu_chart;
use crate::history::CpuChartWindow;

pub fn draw_cpu_chart(f: &mut ratatui::Frame<'_>, area: Rect, window: &CpuChartWindow) {
    let title = match window.usage().back() {
        Some(now) => format!("CPU (now: {now:>5.1}%)"),
        None => "CPU".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    if window.is_empty() {
        f.render_widget(block, area);
        return;
    }

    let input = cpu_chart(window);
    let usage: Vec<(f64, f64)> = input.series[0]
        .points
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();
    let temperature: Vec<(f64, f64)> = input.series[1]
        .points
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name(input.series[0].name.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&usage),
        Dataset::default()
            .name(input.series[1].name.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&temperature),
    ];

    // Show the window's first and last timestamps on the x axis.
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
        .y_axis(
            Axis::default()
                .bounds([0.0, 110.0])
                .labels(vec!["0".to_string(), "55".to_string(), "110".to_string()]),
        );
    f.render_widget(chart, area);
}
