use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};

use crate::history::HistoryEntry;
use crate::search::SearchOutcome;
use crate::theme::ColorScheme;
use crate::types::{AppEvent, VideoCard};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Typing into the search box
    Editing,
    /// Moving through result cards
    Browse,
    /// Recent searches overlay
    History,
    /// "Blocked Search" modal
    BlockedDialog,
}

/// Clickable regions of one rendered card (filled in by the UI layer)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CardHitbox {
    pub index: usize,
    pub thumbnail: Option<Rect>,
    pub watch: Rect,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardTarget {
    Thumbnail,
    Watch,
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub struct App {
    quit: bool,
    fps: u32,
    theme: ColorScheme,
    input_mode: InputMode,

    query: String,
    videos: Vec<VideoCard>,
    selected: usize,
    scroll: usize,                  // index of the first visible card
    card_hitboxes: Vec<CardHitbox>,

    // Latest submit wins: outcomes carrying an older seq are dropped
    search_seq: u64,
    in_flight: bool,

    history_entries: Vec<HistoryEntry>,
    history_selection: usize,

    toast_message: Option<(String, Instant, bool)>,  // (message, shown at, is_error)
    debug_log: Vec<String>,
    debug_visible: bool,
    spinner_idx: usize,
}

impl App {
    pub fn new(fps: u32, theme: ColorScheme) -> Self {
        Self {
            quit: false,
            fps,
            theme,
            input_mode: InputMode::Editing,
            query: String::new(),
            videos: Vec::new(),
            selected: 0,
            scroll: 0,
            card_hitboxes: Vec::new(),
            search_seq: 0,
            in_flight: false,
            history_entries: Vec::new(),
            history_selection: 0,
            toast_message: None,
            debug_log: Vec::new(),
            debug_visible: false,
            spinner_idx: 0,
        }
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 { self.fps }
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn theme(&self) -> &ColorScheme { &self.theme }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn query(&self) -> &str { &self.query }
    pub fn videos(&self) -> &[VideoCard] { &self.videos }
    pub fn selected(&self) -> usize { self.selected }
    pub fn scroll(&self) -> usize { self.scroll }
    pub fn in_flight(&self) -> bool { self.in_flight }
    pub fn history_entries(&self) -> &[HistoryEntry] { &self.history_entries }
    pub fn history_selection(&self) -> usize { self.history_selection }
    pub fn debug_log(&self) -> &[String] { &self.debug_log }
    pub fn debug_visible(&self) -> bool { self.debug_visible }

    pub fn selected_video(&self) -> Option<&VideoCard> {
        self.videos.get(self.selected)
    }

    // ----- toast / debug -----
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now(), false));
    }

    pub fn show_error(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now(), true));
    }

    /// Current toast if still active (visible for 3 seconds) and whether it is an error
    pub fn toast_message(&self) -> Option<(&str, bool)> {
        const TOAST_DURATION: Duration = Duration::from_secs(3);
        self.toast_message.as_ref().and_then(|(msg, time, is_error)| {
            if time.elapsed() < TOAST_DURATION {
                Some((msg.as_str(), *is_error))
            } else {
                None
            }
        })
    }

    pub fn log_debug(&mut self, msg: String) {
        const MAX_LOG_ENTRIES: usize = 50;

        log::debug!("{msg}");
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.debug_log.push(format!("[{timestamp}] {msg}"));
        if self.debug_log.len() > MAX_LOG_ENTRIES {
            self.debug_log.remove(0);
        }
    }

    pub fn toggle_debug_panel(&mut self) {
        self.debug_visible = !self.debug_visible;
    }

    pub fn tick_spinner(&mut self) {
        if self.in_flight {
            self.spinner_idx = (self.spinner_idx + 1) % SPINNER.len();
        }
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.spinner_idx]
    }

    // ----- input -----
    pub fn focus_input(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    /// Leave the search box for the card list (only when there are cards)
    pub fn browse(&mut self) {
        if !self.videos.is_empty() {
            self.input_mode = InputMode::Browse;
        }
    }

    pub fn query_add_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn query_backspace(&mut self) {
        self.query.pop();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn set_query(&mut self, q: String) {
        self.query = q;
    }

    /// Start a search for the current query.
    ///
    /// Returns the sequence number and the raw query to hand to the search
    /// task, or `None` if the query is blank.
    pub fn submit(&mut self) -> Option<(u64, String)> {
        if self.query.trim().is_empty() {
            return None;
        }
        self.search_seq += 1;
        self.in_flight = true;
        self.log_debug(format!("submit #{} {:?}", self.search_seq, self.query));
        Some((self.search_seq, self.query.clone()))
    }

    /// Apply a finished search. Returns false if the outcome was stale.
    pub fn apply_outcome(&mut self, seq: u64, outcome: SearchOutcome) -> bool {
        if seq != self.search_seq {
            self.log_debug(format!("dropping stale result #{seq} (latest #{})", self.search_seq));
            return false;
        }
        self.in_flight = false;

        let dismiss = outcome.dismisses_input();
        match outcome {
            SearchOutcome::Skipped => {}
            SearchOutcome::Blocked { term } => {
                self.log_debug(format!("blocked by {term:?}"));
                self.input_mode = InputMode::BlockedDialog;
            }
            SearchOutcome::Completed { videos } => {
                self.log_debug(format!("#{seq}: {} results", videos.len()));
                if videos.is_empty() {
                    self.show_toast("No videos found".to_string());
                }
                self.set_videos(videos);
            }
            SearchOutcome::Failed { error } => {
                self.log_debug(format!("#{seq} failed: {error}"));
                self.set_videos(Vec::new());
                self.show_error("Search failed".to_string());
            }
        }

        // With nothing to browse the search box keeps focus
        if dismiss && self.input_mode == InputMode::Editing {
            self.browse();
        }
        true
    }

    fn set_videos(&mut self, videos: Vec<VideoCard>) {
        self.videos = videos;
        self.selected = 0;
        self.scroll = 0;
        self.card_hitboxes.clear();
    }

    pub fn dismiss_dialog(&mut self) {
        if self.input_mode == InputMode::BlockedDialog {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::SearchFinished { seq, outcome } => {
                self.apply_outcome(seq, outcome);
            }
            AppEvent::HistoryLoaded(entries) => self.open_history(entries),
        }
    }

    // ----- card navigation -----
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected + 1 < self.videos.len() {
            self.selected += 1;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.videos.len() {
            self.selected = index;
        }
    }

    pub fn home(&mut self) {
        self.selected = 0;
    }

    pub fn end(&mut self) {
        self.selected = self.videos.len().saturating_sub(1);
    }

    pub fn scroll_by(&mut self, delta: i32) {
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() { self.up(); }
        } else {
            for _ in 0..delta { self.down(); }
        }
    }

    /// Adjust the scroll offset so the selected card fits in `avail` rows,
    /// given the rendered height of every card
    pub fn ensure_visible(&mut self, heights: &[u16], avail: u16) {
        if heights.is_empty() {
            self.scroll = 0;
            return;
        }
        let selected = self.selected.min(heights.len() - 1);
        if selected < self.scroll {
            self.scroll = selected;
            return;
        }
        while self.scroll < selected {
            let used: u32 = heights[self.scroll..=selected].iter().map(|&h| h as u32).sum();
            if used <= avail as u32 {
                break;
            }
            self.scroll += 1;
        }
    }

    pub fn set_card_hitboxes(&mut self, hitboxes: Vec<CardHitbox>) {
        self.card_hitboxes = hitboxes;
    }

    /// Which card element (if any) sits under a terminal cell
    pub fn hit_test(&self, col: u16, row: u16) -> Option<(usize, CardTarget)> {
        let pos = Position::new(col, row);
        self.card_hitboxes.iter().find_map(|hb| {
            if hb.thumbnail.is_some_and(|r| r.contains(pos)) {
                Some((hb.index, CardTarget::Thumbnail))
            } else if hb.watch.contains(pos) {
                Some((hb.index, CardTarget::Watch))
            } else {
                None
            }
        })
    }

    pub fn link_for(&self, index: usize) -> Option<&str> {
        self.videos.get(index).map(|v| v.link.as_str())
    }

    // ----- history overlay -----
    pub fn open_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history_entries = entries;
        self.history_selection = 0;
        self.input_mode = InputMode::History;
    }

    pub fn history_up(&mut self) {
        self.history_selection = self.history_selection.saturating_sub(1);
    }

    pub fn history_down(&mut self) {
        if self.history_selection + 1 < self.history_entries.len() {
            self.history_selection += 1;
        }
    }

    pub fn close_history(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    /// Put the selected history term into the search box and close the overlay
    pub fn use_selected_history(&mut self) -> bool {
        let Some(entry) = self.history_entries.get(self.history_selection) else {
            return false;
        };
        self.query = entry.term.clone();
        self.close_history();
        true
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }
}
