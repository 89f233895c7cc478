//! Status bar widget - shows ports, baud rate and traffic counters

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{SessionInfo, Traffic};

/// Render the status bar
pub fn render_status(frame: &mut Frame, area: Rect, session: &SessionInfo, traffic: &Traffic) {
    let block = Block::default()
        .title(" serial-midi ")
        .borders(Borders::ALL);

    let line = Line::from(vec![
        Span::styled(
            format!(" {} @ {} baud  ", session.serial_port, session.baud),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("→ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}  ", session.output_port),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("Bytes: {}  ", traffic.bytes),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Sent: {}  ", traffic.sent),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("Discarded: {}", traffic.discarded),
            Style::default().fg(if traffic.discarded > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
