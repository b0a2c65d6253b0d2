//! Top header with the agent URL, platform, and the transient notice line.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::app::{App, NoticeKind};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let title = if let Some(mm) = &app.snapshot {
        let platform = mm.system.platform.as_deref().unwrap_or("unknown");
        let mut head = format!("tasktop {} | {}", app.url, platform);
        if let Some(ipv4) = mm.network.ipv4.as_deref().filter(|s| !s.is_empty()) {
            head.push_str(&format!(" | {ipv4}"));
        }
        format!("{head}  (press 'q' quit, 'm' metric, 'r' report)")
    } else {
        format!("tasktop {} | connecting...  (press 'q' to quit)", app.url)
    };

    let mut spans = vec![Span::raw(title)];
    if let Some(notice) = &app.notice {
        let style = match notice.kind {
            NoticeKind::Info => Style::default().fg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(notice.text.clone(), style));
    }

    f.render_widget(
        Block::default()
            .title(Line::from(spans))
            .borders(Borders::BOTTOM),
        area,
    );
}
