//! System details panel: identity, activity, addresses, and the SMART verdict.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::types::MetricsSnapshot;
use crate::ui::util::or_dash;

pub fn draw_system(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let block = Block::default().borders(Borders::ALL).title("System");
    let Some(mm) = m else {
        f.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(name, label), Span::raw(value)])
    };

    let smart_style = match mm.smart.status.as_str() {
        "PASSED" => Style::default().fg(Color::Green),
        "FAILED" => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Gray),
    };

    let lines = vec![
        row("Model:      ", or_dash(&mm.cpu.model).to_string()),
        row("Cores:      ", or_dash(&mm.cpu.cores).to_string()),
        row("Speed:      ", or_dash(&mm.cpu.speed).to_string()),
        row("Platform:   ", or_dash(&mm.system.platform).to_string()),
        row("Uptime:     ", or_dash(&mm.system.uptime).to_string()),
        row("Booted:     ", or_dash(&mm.system.boot_time).to_string()),
        row("Load avg:   ", or_dash(&mm.system.load_average).to_string()),
        row("Processes:  ", or_dash(&mm.system.processes).to_string()),
        Line::from(vec![
            Span::styled("SMART:      ", label),
            Span::styled(mm.smart.status.clone(), smart_style),
        ]),
        row(
            "Net:        ",
            format!(
                "{} | {} | {}",
                or_dash(&mm.network.adapter),
                or_dash(&mm.network.ipv4),
                or_dash(&mm.network.ipv6)
            ),
        ),
        row(
            "Traffic:    ",
            format!(
                "tx {} | rx {}",
                or_dash(&mm.network.tx),
                or_dash(&mm.network.rx)
            ),
        ),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
