//! GPU panel: temperature bars with a detail line per device.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{BarChart, Block, Borders, Paragraph},
};

use crate::charts::gpu_chart;
use crate::types::MetricsSnapshot;
use crate::ui::util::truncate_middle;

pub fn draw_gpu(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let mut area = area;
    let block = Block::default().borders(Borders::ALL).title("GPU");
    f.render_widget(block, area);

    // Guard: need some space inside the block
    if area.height <= 2 || area.width <= 2 {
        return;
    }

    // Inner padding consistent with the rest of the app
    area.y += 1;
    area.height = area.height.saturating_sub(2);
    area.x += 1;
    area.width = area.width.saturating_sub(2);

    let Some(mm) = m else {
        return;
    };
    if mm.gpus.is_empty() {
        f.render_widget(Paragraph::new("No GPUs reported"), area);
        return;
    }

    let detail_height = (mm.gpus.len() as u16).min(area.height.saturating_sub(3));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(detail_height)])
        .split(area);

    // Temperature bars, one per device. Unreadable temps plot as zero.
    let input = gpu_chart(&mm.gpus);
    let bars: Vec<(&str, u64)> = input
        .labels
        .iter()
        .zip(&input.series[0].points)
        .map(|(name, temp)| (name.as_str(), temp.round().max(0.0) as u64))
        .collect();
    let chart = BarChart::default()
        .data(bars.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .max(110)
        .bar_style(Style::default().fg(Color::Red))
        .value_style(Style::default().fg(Color::Black).bg(Color::Red));
    f.render_widget(chart, rows[0]);

    for (i, g) in mm.gpus.iter().enumerate().take(rows[1].height as usize) {
        let line_area = Rect {
            x: rows[1].x,
            y: rows[1].y + i as u16,
            width: rows[1].width,
            height: 1,
        };
        let util = g
            .utilization
            .as_ref()
            .map(|u| format!("{u}%"))
            .unwrap_or_else(|| "-".to_string());
        let text = format!(
            "{}  util: {util}  vram: {}  temp: {}",
            truncate_middle(&g.name, 24),
            g.vram,
            g.temperature
        );
        f.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray))),
            line_area,
        );
    }
}
