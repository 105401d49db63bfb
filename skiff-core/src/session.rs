//! Browser session state and command dispatch.
//!
//! The presentation layer turns button presses, menu activations and engine
//! signals into [`Command`]s, hands them to [`BrowserSession::dispatch`], and
//! applies the returned [`Effect`]s to its widgets and web views. The session
//! never touches a widget itself.

use std::fmt;
use std::str::FromStr;

use crate::address::{normalize_input, tab_label};
use crate::bookmarks::BookmarkEditor;
use crate::config::{Config, ConfigStore};
use crate::history::{HistoryEntry, HistoryStore, HISTORY_MENU_LIMIT};
use crate::history_view::{group_by_week, WeekGroup};
use crate::paths::ProfilePaths;

/// Stable identifier of a tab, never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("tab-").unwrap_or(s).parse().map(TabId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
    pub title: String,
}

/// Requests flowing into the session: user intents and engine notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Address bar submitted with the given raw text.
    Navigate(String),
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    /// Open a bookmark or history URL in a new tab.
    OpenUrl(String),
    CloseTab(TabId),
    SelectTab(TabId),
    MoveTab { tab: TabId, position: usize },
    UrlChanged { tab: TabId, url: String },
    TitleChanged { tab: TabId, title: String },
    /// Bookmark the raw address bar text.
    AddBookmark(String),
    /// Replace the bookmark list with the result of an edit session.
    CommitBookmarks(Vec<String>),
    Shutdown,
}

/// Instructions flowing out of the session to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadUrl { tab: TabId, url: String },
    GoBack { tab: TabId },
    GoForward { tab: TabId },
    Reload { tab: TabId },
    /// Append a tab showing `url` and select it.
    OpenTab { tab: TabId, url: String, title: String },
    CloseTab { tab: TabId },
    SelectTab { tab: TabId },
    SetTabTitle { tab: TabId, title: String },
    SetAddress(String),
    RefreshBookmarks,
    RefreshHistory,
}

pub struct BrowserSession {
    config_store: ConfigStore,
    config: Config,
    history: HistoryStore,
    tabs: Vec<Tab>,
    current: Option<TabId>,
    next_tab_id: u64,
}

impl BrowserSession {
    /// Load config and history from the profile.
    pub fn open(paths: &ProfilePaths) -> Self {
        let config_store = ConfigStore::new(&paths.config_file);
        let history = HistoryStore::open(&paths.history_file);
        Self::with_stores(config_store, history)
    }

    pub fn with_stores(config_store: ConfigStore, history: HistoryStore) -> Self {
        let config = config_store.load();
        log::info!(
            "Session opened: home page {}, {} bookmarks, {} history entries",
            config.home_page,
            config.bookmarks.len(),
            history.len()
        );
        BrowserSession {
            config_store,
            config,
            history,
            tabs: Vec::new(),
            current: None,
            next_tab_id: 1,
        }
    }

    /// Effects that bring a fresh window up: one tab on the home page and
    /// populated menus.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.tabs.is_empty() {
            let home = self.config.home_page.clone();
            self.open_tab(&home, &mut effects);
        }
        effects.push(Effect::RefreshBookmarks);
        effects.push(Effect::RefreshHistory);
        effects
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn home_page(&self) -> &str {
        &self.config.home_page
    }

    pub fn bookmarks(&self) -> &[String] {
        &self.config.bookmarks
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Entries for the History menu, newest first.
    pub fn recent_history(&self) -> Vec<HistoryEntry> {
        self.history.recent(HISTORY_MENU_LIMIT).cloned().collect()
    }

    pub fn history_groups(&self) -> Vec<WeekGroup> {
        group_by_week(self.history.entries())
    }

    /// Begin a bookmark edit session on a copy of the committed list.
    pub fn bookmark_editor(&self) -> BookmarkEditor {
        BookmarkEditor::new(&self.config.bookmarks)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.current.and_then(|id| self.tab(id))
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        log::debug!("dispatch {:?}", command);
        let mut effects = Vec::new();
        match command {
            Command::Navigate(input) => {
                if let Some(url) = normalize_input(&input) {
                    self.load_in_current(&url, &mut effects);
                    self.record_visit(&url, &mut effects);
                }
            }
            Command::Back => {
                if let Some(tab) = self.current {
                    effects.push(Effect::GoBack { tab });
                }
            }
            Command::Forward => {
                if let Some(tab) = self.current {
                    effects.push(Effect::GoForward { tab });
                }
            }
            Command::Reload => {
                if let Some(tab) = self.current {
                    effects.push(Effect::Reload { tab });
                }
            }
            Command::Home => {
                let home = self.config.home_page.clone();
                self.load_in_current(&home, &mut effects);
            }
            Command::NewTab => {
                let home = self.config.home_page.clone();
                self.open_tab(&home, &mut effects);
            }
            Command::OpenUrl(url) => {
                self.record_visit(&url, &mut effects);
                self.open_tab(&url, &mut effects);
                if let Some(tab) = self.current {
                    // Bookmark and history tabs are labelled with the full URL
                    // until the page reports a title.
                    self.set_title(tab, &url, &mut effects);
                }
            }
            Command::CloseTab(tab) => self.close_tab(tab, &mut effects),
            Command::SelectTab(tab) => {
                if let Some(url) = self.tab(tab).map(|t| t.url.clone()) {
                    self.current = Some(tab);
                    effects.push(Effect::SetAddress(url));
                }
            }
            Command::MoveTab { tab, position } => {
                if let Some(from) = self.position(tab) {
                    let moved = self.tabs.remove(from);
                    let to = position.min(self.tabs.len());
                    self.tabs.insert(to, moved);
                }
            }
            Command::UrlChanged { tab, url } => {
                if let Some(entry) = self.tabs.iter_mut().find(|t| t.id == tab) {
                    entry.url = url.clone();
                    if self.current == Some(tab) {
                        effects.push(Effect::SetAddress(url));
                    }
                }
            }
            Command::TitleChanged { tab, title } => {
                let title = if title.trim().is_empty() {
                    match self.tab(tab) {
                        Some(t) => tab_label(&t.url),
                        None => return effects,
                    }
                } else {
                    title
                };
                self.set_title(tab, &title, &mut effects);
            }
            Command::AddBookmark(input) => {
                if let Some(url) = normalize_input(&input) {
                    if self.config.add_bookmark(&url) {
                        log::info!("Bookmarked {}", url);
                        self.persist_config();
                        effects.push(Effect::RefreshBookmarks);
                    }
                }
            }
            Command::CommitBookmarks(bookmarks) => {
                self.config.bookmarks = bookmarks;
                self.persist_config();
                effects.push(Effect::RefreshBookmarks);
            }
            Command::Shutdown => {
                self.persist_config();
                if let Err(e) = self.history.save() {
                    log::error!("Failed to save history: {}", e);
                }
            }
        }
        effects
    }

    fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn open_tab(&mut self, url: &str, effects: &mut Vec<Effect>) {
        let id = TabId(self.next_tab_id);
        self.next_tab_id += 1;
        let title = tab_label(url);
        self.tabs.push(Tab {
            id,
            url: url.to_string(),
            title: title.clone(),
        });
        self.current = Some(id);
        effects.push(Effect::OpenTab {
            tab: id,
            url: url.to_string(),
            title,
        });
        effects.push(Effect::SetAddress(url.to_string()));
    }

    fn load_in_current(&mut self, url: &str, effects: &mut Vec<Effect>) {
        let Some(id) = self.current else {
            self.open_tab(url, effects);
            return;
        };
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) {
            tab.url = url.to_string();
        }
        effects.push(Effect::LoadUrl {
            tab: id,
            url: url.to_string(),
        });
        effects.push(Effect::SetAddress(url.to_string()));
    }

    fn close_tab(&mut self, id: TabId, effects: &mut Vec<Effect>) {
        if self.tabs.len() <= 1 {
            log::debug!("Refusing to close the last tab");
            return;
        }
        let Some(index) = self.position(id) else {
            return;
        };
        self.tabs.remove(index);
        effects.push(Effect::CloseTab { tab: id });

        if self.current == Some(id) {
            let next = &self.tabs[index.min(self.tabs.len() - 1)];
            self.current = Some(next.id);
            effects.push(Effect::SelectTab { tab: next.id });
            effects.push(Effect::SetAddress(next.url.clone()));
        }
    }

    fn set_title(&mut self, id: TabId, title: &str, effects: &mut Vec<Effect>) {
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) {
            tab.title = title.to_string();
            effects.push(Effect::SetTabTitle {
                tab: id,
                title: title.to_string(),
            });
        }
    }

    fn record_visit(&mut self, url: &str, effects: &mut Vec<Effect>) {
        if let Err(e) = self.history.append(url) {
            log::error!("Failed to record history for {}: {}", url, e);
        }
        effects.push(Effect::RefreshHistory);
    }

    fn persist_config(&self) {
        if let Err(e) = self.config_store.save(&self.config) {
            log::error!("Failed to save config: {}", e);
        }
    }
}
