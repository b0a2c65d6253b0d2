//! RAM gauge fed by the reported used/free percent split.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

use crate::charts::ram_chart;
use crate::types::MetricsSnapshot;
use crate::ui::util::or_dash;

pub fn draw_ram(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let (pct, label) = match m {
        Some(mm) => {
            let input = ram_chart(&mm.ram);
            let used = input.series[0].points[0];
            let label = format!(
                "{used:.1}% used | {} free of {}",
                or_dash(&mm.ram.available),
                or_dash(&mm.ram.total)
            );
            (used.clamp(0.0, 100.0) as u16, label)
        }
        None => (0, "no data".to_string()),
    };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("RAM"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(pct)
        .label(label);
    f.render_widget(g, area);
}
