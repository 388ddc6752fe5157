//! UI-facing orchestration
//!
//! This module sequences the store calls behind one entity screen: count,
//! clamp the requested page, fetch it, and publish a [`PageView`] plus a
//! [`Status`] line. The rendering layer only observes those two values.

use crate::errors::{ConstraintKind, StoreError};
use crate::pager::{self, DEFAULT_PAGE_SIZE, PageRequest};
use crate::query::{SearchTerm, SortOrder};
use crate::store::{Record, SearchStore};
use crate::validate::{Validate, Validation};

/// What the rendering layer shows for one entity list
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    pub rows: Vec<T>,
    pub total: i64,
    pub page_count: u32,
    pub page_index: u32,
}

impl<T> Default for PageView<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            page_count: 1,
            page_index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line status shown alongside the list
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Reduce a store error to a line the status bar can show
fn status_text(error: &StoreError) -> String {
    match error {
        StoreError::Validation(message) => message.clone(),
        StoreError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        } => "A record with these details already exists".to_string(),
        StoreError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        } => "A related record is missing or still in use".to_string(),
        StoreError::NotFound { .. } => "The record no longer exists".to_string(),
        StoreError::Connectivity(_) => "Database connection failed".to_string(),
        StoreError::Internal(_) => "An unexpected error occurred".to_string(),
    }
}

/// Orchestrates one entity screen over any [`SearchStore`]
pub struct EntityController<S: SearchStore> {
    store: S,
    label: &'static str,
    page_size: u32,
    term: SearchTerm,
    sort: <S::Model as Record>::Sort,
    order: SortOrder,
    view: PageView<S::Model>,
    status: Status,
}

impl<S> EntityController<S>
where
    S: SearchStore,
    S::Model: Validate,
{
    /// Create a controller labelled for its entity ("doctor", "patient", ...)
    pub fn new(store: S, label: &'static str) -> Self {
        Self {
            store,
            label,
            page_size: DEFAULT_PAGE_SIZE,
            term: SearchTerm::All,
            sort: <S::Model as Record>::Sort::default(),
            order: SortOrder::Asc,
            view: PageView::default(),
            status: Status::info("Ready"),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn view(&self) -> &PageView<S::Model> {
        &self.view
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn term(&self) -> &SearchTerm {
        &self.term
    }

    /// Classify the raw input and show its first page
    pub async fn search(&mut self, raw_term: &str) {
        self.term = SearchTerm::parse(raw_term);
        self.view.page_index = 0;
        self.refresh().await;
    }

    /// Jump to a page; out-of-range indexes land on the last page
    pub async fn goto_page(&mut self, index: u32) {
        self.view.page_index = index;
        self.refresh().await;
    }

    /// Re-sort the current result
    pub async fn sort_by(&mut self, sort: <S::Model as Record>::Sort, order: SortOrder) {
        self.sort = sort;
        self.order = order;
        self.refresh().await;
    }

    /// Reload the current page, rewriting the status either way
    pub async fn refresh(&mut self) {
        match self.load().await {
            Ok(()) => {
                self.status = Status::info(format!("{} record(s) found", self.view.total));
            }
            Err(error) => self.status = Status::error(status_text(&error)),
        }
    }

    async fn load(&mut self) -> Result<(), StoreError> {
        let total = self.store.count(&self.term).await?;
        let page_count = pager::page_count(total, self.page_size);
        let page_index = pager::clamp_page_index(self.view.page_index, page_count);
        let page = PageRequest::new(page_index, self.page_size);

        let rows = self
            .store
            .search(&self.term, self.sort, self.order, page.size, page.offset())
            .await?;

        self.view = PageView {
            rows,
            total,
            page_count,
            page_index,
        };
        Ok(())
    }

    /// Validate and save a form model.
    ///
    /// Returns `true` when the save went through (the caller clears the
    /// form); `false` leaves the form as it was, with the reason in the
    /// status.
    pub async fn submit(&mut self, model: &S::Model) -> bool {
        // Local rejection, before any I/O
        if let Validation::Invalid(message) = model.validate() {
            self.status = Status::error(message);
            return false;
        }

        match self.store.save(model).await {
            Ok(id) => {
                self.status = match self.load().await {
                    Ok(()) => Status::success(format!("Saved {} #{}", self.label, id)),
                    Err(error) => Status::error(status_text(&error)),
                };
                true
            }
            Err(error) => {
                self.status = Status::error(status_text(&error));
                false
            }
        }
    }

    /// Delete the selected row, if there is one
    pub async fn remove(&mut self, selected: Option<i64>) -> bool {
        let Some(id) = selected else {
            self.status = Status::error(format!("Select a {} to delete", self.label));
            return false;
        };

        match self.store.delete(id).await {
            Ok(()) => {
                self.status = match self.load().await {
                    Ok(()) => Status::success(format!("Deleted {} #{}", self.label, id)),
                    Err(error) => Status::error(status_text(&error)),
                };
                true
            }
            Err(error) => {
                self.status = Status::error(status_text(&error));
                false
            }
        }
    }
}
