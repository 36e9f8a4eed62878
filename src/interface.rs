//! Terminal reader.
//!
//! [`ReaderState`] holds the reading position and applies key presses and
//! timer ticks; [`run`] draws it with ratatui and saves progress through a
//! [`SessionStore`] when the reader pauses, asks for it, or quits.

use crate::progress::{percentage_to_word_index, word_index_to_percentage};
use crate::reading_session::{Session, SessionRecord};
use crate::session::{DiagnosticSink, SessionStore};
use crate::settings::ReaderSettings;
use crate::storage::KeyValueStorage;
use crate::utilities::{chunk, context, tokenize};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const BGRND: Color = Color::Rgb(10, 34, 171);
const TXT: Color = Color::Rgb(63, 252, 123);
const SCRTEXT: Color = Color::Rgb(230, 230, 250);

/// Words shown either side of the chunk while paused.
const CONTEXT_RADIUS: usize = 20;

/// What the loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Save,
    Quit,
}

/// Reading position, preferences and per-run statistics.
#[derive(Debug, Clone)]
pub struct ReaderState {
    text: String,
    words: Vec<String>,
    index: usize,
    settings: ReaderSettings,
    paused: bool,
    words_read: usize,
    reading_time: Duration,
    source: String,
    last_save: Option<bool>,
}

impl ReaderState {
    /// Start reading `text` from the beginning.
    pub fn new(text: String, source: impl Into<String>, settings: ReaderSettings) -> Self {
        let words = tokenize(&text);
        Self {
            text,
            words,
            index: 0,
            settings,
            paused: false,
            words_read: 0,
            reading_time: Duration::ZERO,
            source: source.into(),
            last_save: None,
        }
    }

    /// Continue a stored session. The stored position is clamped to the text;
    /// a missing or non-numeric position starts from the beginning.
    pub fn resume(record: SessionRecord, settings: ReaderSettings) -> Self {
        let index = record
            .word_index()
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0);
        let mut state = Self::new(record.text_str().to_string(), "saved session", settings);
        state.index = index.min(state.words.len());
        state
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn settings(&self) -> ReaderSettings {
        self.settings
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn words_read(&self) -> usize {
        self.words_read
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.words.len()
    }

    fn total(&self) -> i64 {
        i64::try_from(self.words.len()).unwrap_or(i64::MAX)
    }

    /// Completion percentage of the current position.
    pub fn percentage(&self) -> i64 {
        word_index_to_percentage(i64::try_from(self.index).unwrap_or(i64::MAX), self.total())
    }

    /// Move to `percentage` of the text.
    pub fn jump_to_percentage(&mut self, percentage: f64) {
        let index = percentage_to_word_index(percentage, self.total());
        self.index = usize::try_from(index).unwrap_or(0).min(self.words.len());
    }

    /// Advance one chunk unless paused. Returns `false` once the text is finished.
    pub fn tick(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        if !self.paused {
            let next = (self.index + self.settings.chunk_size).min(self.words.len());
            self.words_read += next - self.index;
            self.reading_time += self.settings.word_delay();
            self.index = next;
        }
        true
    }

    /// Tick if a chunk delay has passed since the last one. Returns `None`
    /// when not yet due, otherwise the result of [`Self::tick`].
    pub fn tick_if_due(&mut self, since_last: Duration) -> Option<bool> {
        (since_last >= self.settings.word_delay()).then(|| self.tick())
    }

    pub fn skip_forward(&mut self) {
        self.index = (self.index + self.settings.chunk_size).min(self.words.len());
    }

    pub fn skip_back(&mut self) {
        self.index = self.index.saturating_sub(self.settings.chunk_size);
    }

    pub fn speed_up(&mut self, step: u64) {
        self.settings.speed = self.settings.speed.saturating_add(step);
    }

    pub fn speed_down(&mut self, step: u64) {
        self.settings.speed = self.settings.speed.saturating_sub(step).max(1);
    }

    pub fn set_chunk_size(&mut self, size: usize) {
        self.settings.chunk_size = size.max(1);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Snapshot for the session store.
    pub fn to_session(&self) -> Session {
        Session {
            text: self.text.clone(),
            current_word_index: i64::try_from(self.index).unwrap_or(i64::MAX),
            total_words: self.total(),
            settings: self.settings.to_value(),
        }
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('s') => Action::Save,
            KeyCode::Char(' ') => {
                self.toggle_pause();
                if self.paused {
                    Action::Save
                } else {
                    Action::Continue
                }
            }
            KeyCode::Up => {
                self.speed_up(10);
                Action::Continue
            }
            KeyCode::Down => {
                self.speed_down(10);
                Action::Continue
            }
            KeyCode::PageUp => {
                self.speed_up(100);
                Action::Continue
            }
            KeyCode::PageDown => {
                self.speed_down(100);
                Action::Continue
            }
            KeyCode::Right => {
                self.skip_forward();
                Action::Continue
            }
            KeyCode::Left => {
                self.skip_back();
                Action::Continue
            }
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(size) = c.to_digit(10) {
                    self.set_chunk_size(size as usize);
                }
                Action::Continue
            }
            _ => Action::Continue,
        }
    }

    fn save<S: KeyValueStorage, D: DiagnosticSink>(&mut self, store: &SessionStore<S, D>) {
        let saved = store.save(&self.to_session());
        debug!(index = self.index, saved, "autosave");
        self.last_save = Some(saved);
    }
}

/// Run the reader until the text ends or the user quits, saving on the way out.
pub fn run<S: KeyValueStorage, D: DiagnosticSink>(
    state: &mut ReaderState,
    store: &SessionStore<S, D>,
) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    out.execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = event_loop(&mut terminal, state, store);

    state.save(store);
    if state.last_save == Some(false) {
        warn!("reading position was not saved");
    }

    terminal::disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<S: KeyValueStorage, D: DiagnosticSink>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut ReaderState,
    store: &SessionStore<S, D>,
) -> std::io::Result<()> {
    let mut last_update = Instant::now();

    loop {
        terminal.draw(|f| draw_main_ui(f, state))?;

        let timeout = state
            .settings
            .word_delay()
            .saturating_sub(last_update.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                match state.handle_key(code) {
                    Action::Quit => return Ok(()),
                    Action::Save => state.save(store),
                    Action::Continue => {}
                }
            }
        }

        if let Some(running) = state.tick_if_due(last_update.elapsed()) {
            last_update = Instant::now();
            if !running {
                return Ok(());
            }
        }
    }
}

fn draw_main_ui(f: &mut Frame<'_>, state: &ReaderState) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(8),  // Quick Keys
            Constraint::Percentage(28), // Top Spacer
            Constraint::Percentage(10), // Text Block
            Constraint::Percentage(28), // Context
            Constraint::Percentage(26), // Stats & Progress
        ])
        .split(size);

    f.render_widget(Block::default().style(Style::default().bg(BGRND)), size);

    let quick_keys = Paragraph::new(
        "[Q]uit | [Space] pause/resume | [S]ave | [↑] +10 | [↓] -10 | [PgUp] +100 | [PgDn] -100 | [←/→] skip | [1-9] chunk size",
    )
    .block(Block::default().borders(Borders::ALL).title("Menu Keys"))
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(SCRTEXT).bg(BGRND));
    f.render_widget(quick_keys, chunks[0]);

    let settings = state.settings;
    let word_display = if state.is_finished() {
        "End of text".to_string()
    } else {
        chunk(&state.words, state.index, settings.chunk_size)
    };
    let text_content = Paragraph::new(Text::from(Span::styled(
        word_display,
        Style::default().fg(TXT),
    )))
    .block(Block::default().borders(Borders::ALL).title("Text"))
    .alignment(Alignment::Center)
    .style(Style::default().bg(BGRND).fg(TXT));
    f.render_widget(text_content, chunks[2]);

    if state.paused {
        let (before, after) = context(
            &state.words,
            state.index,
            settings.chunk_size,
            CONTEXT_RADIUS,
        );
        let current = chunk(&state.words, state.index, settings.chunk_size).to_uppercase();
        let chunk_style = Style::default()
            .fg(TXT)
            .bg(Color::Black)
            .add_modifier(Modifier::BOLD);

        let context_text = Text::from(vec![
            Line::from(Span::styled("[Context]", Style::default().fg(TXT))),
            Line::from(""),
            Line::from(vec![
                Span::raw(before),
                Span::styled(format!(" [{current}] "), chunk_style),
                Span::raw(after),
            ]),
        ]);
        let context_block = Paragraph::new(context_text)
            .block(Block::default().borders(Borders::ALL).title("Paused"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(context_block, chunks[3]);
    }

    let stats_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[4]);
    let stats_split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(stats_chunks[0]);

    let left_stats_text = format!(
        "\nSource: {}\nWords Read This Session: {}\nPosition: {} of {}\nReading Time: {:.2} seconds",
        state.source,
        state.words_read,
        state.index,
        state.words.len(),
        state.reading_time.as_secs_f64(),
    );
    let left_stats = Paragraph::new(left_stats_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Reading Statistics"),
        )
        .style(Style::default().fg(SCRTEXT).bg(BGRND));
    f.render_widget(left_stats, stats_split[0]);

    let save_line = match state.last_save {
        None => "not yet saved",
        Some(true) => "saved",
        Some(false) => "save failed",
    };
    let right_stats_text = format!(
        "\nSpeed: {} WPM\nChunk Size: {}\nSession: {save_line}",
        settings.speed, settings.chunk_size
    );
    let right_stats = Paragraph::new(right_stats_text)
        .block(Block::default().borders(Borders::ALL).title("Settings"))
        .style(Style::default().fg(SCRTEXT).bg(BGRND));
    f.render_widget(right_stats, stats_split[1]);

    let percent = u16::try_from(state.percentage().clamp(0, 100)).unwrap_or(100);
    let progress_bar = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green).bg(BGRND))
        .percent(percent);
    f.render_widget(progress_bar, stats_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn reader(text: &str) -> ReaderState {
        ReaderState::new(text.to_string(), "test", ReaderSettings::new(300, 2))
    }

    #[test]
    fn test_tick_advances_by_chunk() {
        let mut state = reader("a b c d e");
        assert!(state.tick());
        assert_eq!(state.index(), 2);
        assert!(state.tick());
        assert!(state.tick());
        assert_eq!(state.index(), 5);
        assert_eq!(state.words_read(), 5);
        assert!(state.is_finished());
        assert!(!state.tick());
    }

    #[test]
    fn test_tick_while_paused() {
        let mut state = reader("a b c");
        assert_eq!(state.handle_key(KeyCode::Char(' ')), Action::Save);
        assert!(state.tick());
        assert_eq!(state.index(), 0);
        assert_eq!(state.handle_key(KeyCode::Char(' ')), Action::Continue);
        assert!(!state.is_paused());
    }

    #[test]
    fn test_keys() {
        let mut state = reader("a b c d e f");
        state.handle_key(KeyCode::Right);
        assert_eq!(state.index(), 2);
        state.handle_key(KeyCode::Left);
        state.handle_key(KeyCode::Left);
        assert_eq!(state.index(), 0);

        state.handle_key(KeyCode::Up);
        assert_eq!(state.settings().speed, 310);
        state.handle_key(KeyCode::PageDown);
        state.handle_key(KeyCode::PageDown);
        state.handle_key(KeyCode::PageDown);
        state.handle_key(KeyCode::PageDown);
        assert_eq!(state.settings().speed, 1);

        state.handle_key(KeyCode::Char('4'));
        assert_eq!(state.settings().chunk_size, 4);
        state.handle_key(KeyCode::Char('0'));
        assert_eq!(state.settings().chunk_size, 4);

        assert_eq!(state.handle_key(KeyCode::Char('s')), Action::Save);
        assert_eq!(state.handle_key(KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_jump_and_percentage() {
        let mut state = reader("a b c d e f g h i j");
        state.jump_to_percentage(50.0);
        assert_eq!(state.index(), 5);
        assert_eq!(state.percentage(), 50);

        state.jump_to_percentage(250.0);
        assert!(state.is_finished());
        assert_eq!(state.percentage(), 100);
    }

    #[test]
    fn test_resume_clamps_position() {
        let record = SessionRecord {
            text: json!("a b c"),
            current_word_index: json!(40),
            total_words: json!(3),
            settings: json!(null),
            saved_at: json!(0),
        };
        let state = ReaderState::resume(record.clone(), ReaderSettings::default());
        assert_eq!(state.index(), 3);

        let resume_at = |index: serde_json::Value| {
            let record = SessionRecord {
                current_word_index: index,
                ..record.clone()
            };
            ReaderState::resume(record, ReaderSettings::default()).index()
        };
        assert_eq!(resume_at(json!(-2)), 0);
        assert_eq!(resume_at(json!(1.7)), 1);
        assert_eq!(resume_at(json!("2")), 0);
        assert_eq!(resume_at(json!(null)), 0);
    }

    #[test]
    fn test_resume_without_text() {
        let state = ReaderState::resume(SessionRecord::default(), ReaderSettings::default());
        assert!(state.words().is_empty());
        assert!(state.is_finished());
    }

    #[test]
    fn test_key_presses_do_not_stall_reading() {
        let mut state = reader("a b c d e f g h");
        let delay = state.settings().word_delay();

        // Auto-repeat delivers keys faster than the word delay; each loop
        // pass still advances once the delay has elapsed.
        for _ in 0..3 {
            state.handle_key(KeyCode::Right);
            state.handle_key(KeyCode::Left);
            assert_eq!(state.tick_if_due(delay / 2), None);
            assert_eq!(state.tick_if_due(delay), Some(true));
        }
        assert_eq!(state.index(), 6);
        assert_eq!(state.tick_if_due(delay), Some(true));
        assert_eq!(state.tick_if_due(delay), Some(false));
    }

    #[test]
    fn test_save_through_store() {
        let store = SessionStore::new(MemoryStorage::new());
        let mut state = reader("one two three four");
        state.tick();
        state.save(&store);
        assert_eq!(state.last_save, Some(true));

        let record = store.load().unwrap();
        assert_eq!(record.current_word_index, json!(2));
        assert_eq!(record.total_words, json!(4));
        assert_eq!(
            ReaderSettings::from_value(&record.settings),
            ReaderSettings::new(300, 2)
        );

        let resumed = ReaderState::resume(record, ReaderSettings::default());
        assert_eq!(resumed.index(), 2);
        assert_eq!(resumed.words().len(), 4);
    }
}
