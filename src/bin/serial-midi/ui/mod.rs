//! TUI module for serial-midi
//!
//! Live view of serial bytes, forwarded events and discarded groups.

mod state;
mod status;
mod traffic;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use serial_midi::{bridge::MonitorRecord, ShutdownToken};
use std::time::Duration;

pub use state::{SessionInfo, Traffic};

use status::render_status;
use traffic::render_traffic;

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for bridge records
    records_rx: Consumer<MonitorRecord>,
    session: SessionInfo,
    traffic: Traffic,
    /// Shared with the bridge loop; cancelled from either side
    shutdown: ShutdownToken,
}

impl UiApp {
    pub fn new(
        records_rx: Consumer<MonitorRecord>,
        session: SessionInfo,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            records_rx,
            session,
            traffic: Traffic::default(),
            shutdown,
        }
    }

    /// Run the UI event loop until quit or until the bridge stops
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.shutdown.is_cancelled() {
            self.poll_records();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_records(&mut self) {
        while let Ok(record) = self.records_rx.pop() {
            self.traffic.push(record);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.shutdown.cancel(),
            // Raw mode swallows SIGINT
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.shutdown.cancel()
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: status, traffic, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(4),    // Traffic
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_status(frame, chunks[0], &self.session, &self.traffic);

        let traffic_block = Block::default().title(" Traffic ").borders(Borders::ALL);
        let traffic_inner = traffic_block.inner(chunks[1]);
        frame.render_widget(traffic_block, chunks[1]);
        render_traffic(frame, traffic_inner, &self.traffic);

        let help = Paragraph::new(" [Q] Quit").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
