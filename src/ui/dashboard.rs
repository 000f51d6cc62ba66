//! Full-screen terminal dashboard: inputs on the left, the live report on the
//! right, a status line at the bottom.

use std::{
    io,
    time::{Duration, Instant, SystemTime},
};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::{
    app::{spawn_fetch, Action, App, AppEvent},
    infra::{CacheStore, PriceClient},
    ui::{
        components::input::{InputAction, InputPanel},
        report_text::render_report,
        theme,
    },
    util::version::{version_label, APP_NAME},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const PAGE: u16 = 10;

enum Mode {
    Normal,
    Command(String),
}

struct Dashboard<C: CacheStore> {
    app: App<C>,
    client: PriceClient,
    inputs: InputPanel,
    mode: Mode,
    scroll: u16,
}

/// Takes over the terminal until the user quits. The terminal is restored on
/// every exit path, including errors from the event stream.
pub async fn run<C: CacheStore>(app: App<C>, client: PriceClient) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = Dashboard::new(app, client).event_loop(&mut terminal).await;
    ratatui::restore();
    result
}

impl<C: CacheStore> Dashboard<C> {
    fn new(app: App<C>, client: PriceClient) -> Self {
        let inputs = InputPanel::new(app.state());
        Self {
            app,
            client,
            inputs,
            mode: Mode::Normal,
            scroll: 0,
        }
    }

    async fn event_loop(mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK_RATE);
        info!("Dashboard started");

        while !self.app.should_quit() {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key, &tx);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err),
                    None => break,
                },
                Some(event) = rx.recv() => self.handle_event(event),
                _ = tick.tick() => self.app.status_mut().prune(Instant::now()),
            }
        }

        info!("Dashboard closed");
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FetchFinished(result) => {
                if self.app.finish_fetch(result).is_ok() {
                    self.inputs.sync(self.app.state());
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, events: &UnboundedSender<AppEvent>) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.app.request_quit();
            return;
        }

        if let Mode::Command(buffer) = &mut self.mode {
            match key.code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Enter => {
                    let line = std::mem::take(buffer);
                    self.mode = Mode::Normal;
                    let action = self.app.run_command(&line);
                    self.perform(action, events);
                    self.inputs.sync(self.app.state());
                }
                KeyCode::Char(ch) => buffer.push(ch),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(':') => self.mode = Mode::Command(String::new()),
            KeyCode::Char('f' | 'F') => {
                let action = self.app.begin_fetch().map_or(Action::None, Action::Fetch);
                self.perform(action, events);
            }
            KeyCode::Char('l' | 'L') => {
                if self.app.load_cache() {
                    self.inputs.sync(self.app.state());
                }
            }
            KeyCode::Char('s' | 'S') => {
                let _ = self.app.save_cache();
            }
            KeyCode::Char('q' | 'Q') => self.app.request_quit(),
            KeyCode::Esc => {
                self.inputs.sync(self.app.state());
                if let Some(id) = self.app.status().latest().map(|message| message.id.clone()) {
                    self.app.status_mut().dismiss(&id);
                }
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::Home => self.scroll = 0,
            _ => {
                if let InputAction::Submit { field, text } = self.inputs.handle_key(key) {
                    if self.app.apply_edit(&field, &text).is_ok() {
                        self.inputs.sync(self.app.state());
                    }
                }
            }
        }
    }

    fn perform(&mut self, action: Action, events: &UnboundedSender<AppEvent>) {
        match action {
            Action::Fetch(catalog) => {
                debug!("Spawning fetch for {} crafted items", catalog.items.len());
                spawn_fetch(self.client.clone(), catalog, events.clone());
            }
            Action::Quit => self.app.request_quit(),
            Action::None => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(36), Constraint::Percentage(64)]).areas(body);

        self.draw_header(frame, header);
        self.draw_inputs(frame, left);
        self.draw_report(frame, right);
        self.draw_status(frame, footer);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let tag = self.app.state().provenance.tag;
        let mut spans = vec![
            Span::styled(format!(" {APP_NAME} "), theme::title()),
            Span::styled(format!("{} ", version_label()), theme::hint()),
            Span::styled(format!(" {} ", tag.label().to_uppercase()), theme::provenance_badge(tag)),
        ];
        if self.app.is_fetching() {
            spans.push(Span::styled("  fetching...", theme::hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_inputs(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for (index, field) in self.inputs.fields().iter().enumerate() {
            let focused = index == self.inputs.focus() && matches!(self.mode, Mode::Normal);
            lines.push(Line::styled(field.label.clone(), theme::hint()));
            lines.push(Line::styled(format!(" {:<18}", field.text), theme::input(focused)));
        }

        lines.push(Line::default());
        lines.push(Line::styled(
            "Enter apply | Tab move | Esc reset | Ctrl-U clear",
            theme::hint(),
        ));
        lines.push(Line::from(vec![
            Span::styled("[F]etch ", theme::button(!self.app.is_fetching())),
            Span::styled("[L]oad ", theme::button(!self.app.is_fetching())),
            Span::styled("[S]ave ", theme::button(true)),
            Span::styled("[Q]uit", theme::button(true)),
        ]));

        if let Mode::Command(buffer) = &self.mode {
            lines.push(Line::default());
            lines.push(Line::styled(format!(":{buffer}_"), theme::input(true)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border(matches!(self.mode, Mode::Normal)))
            .title(" Inputs ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_report(&mut self, frame: &mut Frame, area: Rect) {
        let report = self.app.report(SystemTime::now());
        let lines: Vec<Line> = render_report(&report)
            .into_iter()
            .map(|line| Line::styled(line.text, theme::tone(line.tone)))
            .collect();

        let visible = area.height.saturating_sub(2);
        let max_scroll = u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .saturating_sub(visible);
        self.scroll = self.scroll.min(max_scroll);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border(false))
            .title(" Report (PgUp/PgDn) ");
        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((self.scroll, 0)),
            area,
        );
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.app.status().latest() {
            Some(message) => Line::styled(
                format!(" [{}] {}", theme::status_icon(message.kind), message.text),
                theme::status(message.kind),
            ),
            None => Line::styled(" Press : for commands, :help lists them", theme::hint()),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppState;
    use crate::infra::JsonFileCache;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard(dir: &tempfile::TempDir) -> Dashboard<JsonFileCache> {
        let cache = JsonFileCache::new(dir.path().join("cache.json"));
        let client = PriceClient::new("test-agent").unwrap();
        Dashboard::new(App::new(cache, AppState::default()), client)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(dashboard: &mut Dashboard<JsonFileCache>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 60)).unwrap();
        terminal.draw(|frame| dashboard.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn typed_value_updates_report_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = dashboard(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        dash.handle_key(press(KeyCode::Char('1')), &tx);
        dash.handle_key(press(KeyCode::Char('0')), &tx);
        dash.handle_key(press(KeyCode::Enter), &tx);

        assert_eq!(dash.app.state().snapshot.ingredient_a.avg, 10);
        let text = screen(&mut dash);
        assert!(text.contains("MANUAL"));
        assert!(text.contains("25,200"));
    }

    #[test]
    fn command_prompt_runs_set_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = dashboard(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        for ch in ":set item3 2m".chars() {
            dash.handle_key(press(KeyCode::Char(ch)), &tx);
        }
        assert!(screen(&mut dash).contains(":set item3 2m_"));
        dash.handle_key(press(KeyCode::Enter), &tx);
        assert_eq!(dash.app.state().snapshot.items[2].price.high, 2_000_000);
        assert_eq!(dash.inputs.fields()[4].text, "2000000");

        dash.handle_key(press(KeyCode::Char('s')), &tx);
        assert!(dir.path().join("cache.json").exists());

        dash.handle_key(press(KeyCode::Char('q')), &tx);
        assert!(dash.app.should_quit());
    }

    #[test]
    fn esc_discards_typing_without_quitting() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = dashboard(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        dash.handle_key(press(KeyCode::Char('9')), &tx);
        dash.handle_key(press(KeyCode::Char('9')), &tx);
        assert_eq!(dash.inputs.fields()[0].text, "099");
        dash.app.status_mut().warning("stale warning");

        dash.handle_key(press(KeyCode::Esc), &tx);

        assert!(!dash.app.should_quit());
        assert_eq!(dash.inputs.fields()[0].text, "0");
        assert_eq!(dash.app.state(), &AppState::default());
        assert!(dash.app.status().is_empty());
    }
}
