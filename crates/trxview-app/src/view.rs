// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    BrowseMode, DEFAULT_MAX_PAGE_BUTTONS, DEFAULT_PAGE_SIZE, FilterEngine, PageNav,
    PaginationController, QueryState, Record, RecordStore, ViewCommand, ViewEvent, elapsed_text,
};
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub page_size: usize,
    pub max_page_buttons: usize,
    pub display_offset: UtcOffset,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_buttons: DEFAULT_MAX_PAGE_BUTTONS,
            display_offset: UtcOffset::UTC,
        }
    }
}

/// Everything derived from the snapshot and the query. Rebuilt in full after
/// every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView {
    pub group_keys: Vec<String>,
    pub filtered_records: Vec<Record>,
    pub group_nav: PageNav,
    pub record_nav: PageNav,
}

impl DerivedView {
    pub const fn nav(&self, mode: BrowseMode) -> &PageNav {
        match mode {
            BrowseMode::GroupList => &self.group_nav,
            BrowseMode::RecordDetail => &self.record_nav,
        }
    }
}

pub fn derive_view(
    store: &RecordStore,
    query: &QueryState,
    filter: &FilterEngine,
    pagination: &PaginationController,
) -> DerivedView {
    let snapshot = store.snapshot();
    let filtered_records = filter.filter(snapshot, &query.search_term, &query.selected_group);
    let group_keys = filter.group_keys(snapshot, &query.search_term);
    let group_nav = pagination.nav(group_keys.len(), query.group_page);
    let record_nav = pagination.nav(filtered_records.len(), query.record_page);

    debug!(
        snapshot = snapshot.len(),
        records = filtered_records.len(),
        groups = group_keys.len(),
        group_page = query.group_page,
        record_page = query.record_page,
        "recomputed view"
    );

    DerivedView {
        group_keys,
        filtered_records,
        group_nav,
        record_nav,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub index: usize,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub index: usize,
    pub record: Record,
    pub timestamp_text: Option<String>,
    pub elapsed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRows {
    Groups(Vec<GroupRow>),
    Records(Vec<RecordRow>),
}

impl ViewRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Groups(rows) => rows.len(),
            Self::Records(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only projection handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewProjection {
    pub mode: BrowseMode,
    pub search_term: String,
    pub selected_group: Option<String>,
    pub rows: ViewRows,
    pub nav: PageNav,
    pub group_page: usize,
    pub record_page: usize,
    pub total_groups: usize,
    pub total_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewController {
    store: RecordStore,
    query: QueryState,
    filter: FilterEngine,
    pagination: PaginationController,
    derived: DerivedView,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

impl ViewController {
    pub fn new(settings: ViewSettings) -> Self {
        let store = RecordStore::new();
        let query = QueryState::default();
        let filter = FilterEngine::new(settings.display_offset);
        let pagination = PaginationController::new(settings.page_size, settings.max_page_buttons);
        let derived = derive_view(&store, &query, &filter, &pagination);
        Self {
            store,
            query,
            filter,
            pagination,
            derived,
        }
    }

    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        let events = match command {
            ViewCommand::Load(records) => {
                self.store.load(records);
                self.query.reset_pages();
                self.recompute();
                return vec![ViewEvent::SnapshotLoaded {
                    records: self.store.len(),
                    groups: self.filter.group_keys(self.store.snapshot(), "").len(),
                }];
            }
            ViewCommand::SetSearchTerm(term) => {
                if term == self.query.search_term {
                    return Vec::new();
                }
                self.query.search_term = term.clone();
                self.query.reset_pages();
                vec![ViewEvent::SearchChanged(term)]
            }
            ViewCommand::SelectGroup(key) => {
                if key.is_empty() {
                    return Vec::new();
                }
                self.select(key)
            }
            ViewCommand::ClearGroup => {
                if self.query.selected_group.is_empty() {
                    return Vec::new();
                }
                self.query.selected_group.clear();
                vec![
                    ViewEvent::GroupCleared,
                    ViewEvent::ModeChanged(BrowseMode::GroupList),
                ]
            }
            ViewCommand::GotoPage(mode, page) => {
                if !self.derived.nav(mode).accepts(page) {
                    return vec![ViewEvent::PageRejected { mode, page }];
                }
                self.query.set_page(mode, page);
                vec![ViewEvent::PageChanged { mode, page }]
            }
            ViewCommand::PreviousPage(mode) => {
                let nav = self.derived.nav(mode);
                if !nav.has_previous {
                    return Vec::new();
                }
                let target = nav.current_page - 1;
                return self.dispatch(ViewCommand::GotoPage(mode, target));
            }
            ViewCommand::NextPage(mode) => {
                let nav = self.derived.nav(mode);
                if !nav.has_next {
                    return Vec::new();
                }
                let target = nav.current_page + 1;
                return self.dispatch(ViewCommand::GotoPage(mode, target));
            }
        };

        self.recompute();
        events
    }

    fn select(&mut self, key: String) -> Vec<ViewEvent> {
        let previous_mode = self.query.mode();
        let mut events = vec![ViewEvent::GroupSelected(key.clone())];
        self.query.selected_group = key;
        self.query.record_page = 1;
        if !self.query.search_term.is_empty() {
            // The group list changes with the term, so its cursor goes too.
            self.query.search_term.clear();
            self.query.group_page = 1;
            events.push(ViewEvent::SearchChanged(String::new()));
        }
        if previous_mode != BrowseMode::RecordDetail {
            events.push(ViewEvent::ModeChanged(BrowseMode::RecordDetail));
        }
        events
    }

    pub fn load(&mut self, records: Option<Vec<Record>>) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::Load(records))
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::SetSearchTerm(term.into()))
    }

    pub fn select_group(&mut self, key: impl Into<String>) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::SelectGroup(key.into()))
    }

    pub fn clear_group(&mut self) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::ClearGroup)
    }

    pub fn goto_page(&mut self, mode: BrowseMode, page: usize) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::GotoPage(mode, page))
    }

    pub fn previous_page(&mut self, mode: BrowseMode) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::PreviousPage(mode))
    }

    pub fn next_page(&mut self, mode: BrowseMode) -> Vec<ViewEvent> {
        self.dispatch(ViewCommand::NextPage(mode))
    }

    pub fn recompute(&mut self) {
        self.derived = derive_view(&self.store, &self.query, &self.filter, &self.pagination);
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    pub fn mode(&self) -> BrowseMode {
        self.query.mode()
    }

    pub fn nav(&self, mode: BrowseMode) -> &PageNav {
        self.derived.nav(mode)
    }

    pub fn page_window(&self) -> &[usize] {
        &self.nav(self.mode()).window
    }

    pub fn current_view(&self) -> ViewProjection {
        self.current_view_at(OffsetDateTime::now_utc())
    }

    /// Elapsed-time text is computed against `now` once, here.
    pub fn current_view_at(&self, now: OffsetDateTime) -> ViewProjection {
        let mode = self.mode();
        let nav = self.derived.nav(mode).clone();
        let bounds = match mode {
            BrowseMode::GroupList => self
                .pagination
                .paginate(self.derived.group_keys.len(), self.query.group_page),
            BrowseMode::RecordDetail => self
                .pagination
                .paginate(self.derived.filtered_records.len(), self.query.record_page),
        };

        let rows = match mode {
            BrowseMode::GroupList => ViewRows::Groups(
                bounds
                    .slice(&self.derived.group_keys)
                    .iter()
                    .enumerate()
                    .map(|(offset, key)| GroupRow {
                        index: bounds.start + offset + 1,
                        key: key.clone(),
                    })
                    .collect(),
            ),
            BrowseMode::RecordDetail => {
                let display_offset = self.filter.display_offset();
                ViewRows::Records(
                    bounds
                        .slice(&self.derived.filtered_records)
                        .iter()
                        .enumerate()
                        .map(|(offset, record)| RecordRow {
                            index: bounds.start + offset + 1,
                            record: record.clone(),
                            timestamp_text: record.timestamp_text(display_offset),
                            elapsed: record
                                .timestamp
                                .map(|timestamp| elapsed_text(now, timestamp)),
                        })
                        .collect(),
                )
            }
        };

        ViewProjection {
            mode,
            search_term: self.query.search_term.clone(),
            selected_group: (!self.query.selected_group.is_empty())
                .then(|| self.query.selected_group.clone()),
            rows,
            nav,
            group_page: self.query.group_page,
            record_page: self.query.record_page,
            total_groups: self.derived.group_keys.len(),
            total_records: self.derived.filtered_records.len(),
        }
    }
}
