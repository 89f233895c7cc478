//! Traffic widget - newest records at the bottom, like a scrolling log

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use serial_midi::{bridge::MonitorRecord, NoteKind};

use super::Traffic;

/// Render as many of the latest records as fit in `area`
pub fn render_traffic(frame: &mut Frame, area: Rect, traffic: &Traffic) {
    let visible = area.height as usize;
    let skip = traffic.history.len().saturating_sub(visible);
    let lines: Vec<Line> = traffic.history.iter().skip(skip).map(record_line).collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn record_line(record: &MonitorRecord) -> Line<'static> {
    match record {
        MonitorRecord::Received(bytes) => Line::from(vec![
            Span::styled(" rx   ", Style::default().fg(Color::DarkGray)),
            Span::styled(hex(bytes), Style::default().fg(Color::DarkGray)),
        ]),
        MonitorRecord::Sent(event) => {
            let color = match event.kind {
                NoteKind::NoteOn => Color::Green,
                NoteKind::NoteOff => Color::Yellow,
            };
            Line::from(vec![
                Span::styled(" sent ", Style::default().fg(color)),
                Span::styled(event.to_string(), Style::default().fg(Color::White)),
            ])
        }
        MonitorRecord::Discarded(group) => Line::from(vec![
            Span::styled(" drop ", Style::default().fg(Color::Red)),
            Span::styled(
                format!("{}  (unrecognized status)", hex(group)),
                Style::default().fg(Color::Red),
            ),
        ]),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
