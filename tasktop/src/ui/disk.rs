//! Disk gauge over the normalized totals, plus the partition table.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge, Row, Table},
};

use crate::charts::disk_chart;
use crate::types::MetricsSnapshot;
use crate::ui::util::truncate_middle;

pub fn draw_disk_gauge(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let (pct, label) = match m {
        Some(mm) => {
            let input = disk_chart(&mm.disk);
            let used = input.series[0].points[0];
            let free = input.series[0].points[1];
            let total = used + free;
            if total > 0.0 {
                let pct = (used / total * 100.0).clamp(0.0, 100.0) as u16;
                (pct, format!("{used:.1}G / {total:.1}G"))
            } else {
                (0, "no data".to_string())
            }
        }
        None => (0, "no data".to_string()),
    };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Disk"))
        .gauge_style(Style::default().fg(Color::Yellow))
        .percent(pct)
        .label(label);
    f.render_widget(g, area);
}

pub fn draw_partitions(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let block = Block::default().borders(Borders::ALL).title("Partitions");
    let Some(parts) = m.and_then(|mm| mm.disk.partitions.as_deref()) else {
        f.render_widget(block, area);
        return;
    };

    let header =
        Row::new(["Mount", "Size", "Used", "Avail", "Use%"]).style(Style::default().fg(Color::Cyan));
    let rows: Vec<Row> = parts
        .iter()
        .map(|p| {
            // Near-full filesystems stand out
            let style = if p.used_percent >= 90.0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new([
                truncate_middle(&p.mount, 18),
                p.total.clone(),
                p.used.clone(),
                p.available.clone(),
                format!("{:.0}%", p.used_percent),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1);
    f.render_widget(table, area);
}
