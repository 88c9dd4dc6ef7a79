// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseMode {
    GroupList,
    RecordDetail,
}

impl BrowseMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GroupList => "groups",
            Self::RecordDetail => "records",
        }
    }
}

/// Transient query inputs. Each browsing mode keeps its own page cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub selected_group: String,
    pub group_page: usize,
    pub record_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_group: String::new(),
            group_page: 1,
            record_page: 1,
        }
    }
}

impl QueryState {
    pub fn mode(&self) -> BrowseMode {
        if self.selected_group.is_empty() {
            BrowseMode::GroupList
        } else {
            BrowseMode::RecordDetail
        }
    }

    pub const fn page(&self, mode: BrowseMode) -> usize {
        match mode {
            BrowseMode::GroupList => self.group_page,
            BrowseMode::RecordDetail => self.record_page,
        }
    }

    pub fn set_page(&mut self, mode: BrowseMode, page: usize) {
        match mode {
            BrowseMode::GroupList => self.group_page = page,
            BrowseMode::RecordDetail => self.record_page = page,
        }
    }

    pub fn reset_pages(&mut self) {
        self.group_page = 1;
        self.record_page = 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Load(Option<Vec<Record>>),
    SetSearchTerm(String),
    SelectGroup(String),
    ClearGroup,
    GotoPage(BrowseMode, usize),
    PreviousPage(BrowseMode),
    NextPage(BrowseMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SnapshotLoaded { records: usize, groups: usize },
    SearchChanged(String),
    GroupSelected(String),
    GroupCleared,
    ModeChanged(BrowseMode),
    PageChanged { mode: BrowseMode, page: usize },
    PageRejected { mode: BrowseMode, page: usize },
}

#[cfg(test)]
mod tests {
    use super::{BrowseMode, QueryState};

    #[test]
    fn mode_follows_selected_group() {
        let mut query = QueryState::default();
        assert_eq!(query.mode(), BrowseMode::GroupList);

        query.selected_group = "01711000001".to_owned();
        assert_eq!(query.mode(), BrowseMode::RecordDetail);
    }

    #[test]
    fn page_cursors_are_independent() {
        let mut query = QueryState::default();
        query.set_page(BrowseMode::GroupList, 3);
        query.set_page(BrowseMode::RecordDetail, 2);
        assert_eq!(query.page(BrowseMode::GroupList), 3);
        assert_eq!(query.page(BrowseMode::RecordDetail), 2);

        query.reset_pages();
        assert_eq!((query.group_page, query.record_page), (1, 1));
    }
}
