//! List transform pipeline: filter, then sort, then paginate.
//!
//! Everything here is pure. The only cache is [`PageMemo`], which callers own
//! explicitly and key on the records generation plus the view state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use feruca::{Collator, Tailoring};

use crate::load::Ticket;
use crate::search::apply_search;
use crate::source::UserRecord;

/// Rows per page on the list screen.
pub const PAGE_SIZE: usize = 5;

/// Ordering applied to the filtered records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Keep server order.
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortOrder {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Ascending => "A → Z",
            Self::Descending => "Z → A",
        }
    }

    /// None → Ascending → Descending → None.
    pub const fn next(self) -> Self {
        match self {
            Self::None => Self::Ascending,
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort order '{other}' (expected none, asc or desc)")),
        }
    }
}

/// Per-list UI state: search text, sort order and the 1-based page index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    search_text: String,
    sort_order: SortOrder,
    page_index: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_order: SortOrder::None,
            page_index: 1,
        }
    }
}

impl ViewState {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            sort_order,
            ..Self::default()
        }
    }

    /// Place the view on an arbitrary page without clamping.
    pub fn with_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index.max(1);
        self
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page_index = 1;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut text = std::mem::take(&mut self.search_text);
        text.push(c);
        self.set_search(text);
    }

    pub fn pop_search_char(&mut self) {
        let mut text = std::mem::take(&mut self.search_text);
        text.pop();
        self.set_search(text);
    }

    pub fn set_sort(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.page_index = 1;
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort_order.next());
    }

    /// Step forward; no-op on the last page.
    pub fn next_page(&mut self, total_pages: usize) -> bool {
        if self.page_index < total_pages {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Step back; no-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page_index > 1 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped to `[1, max(1, total_pages)]`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page_index = page.clamp(1, total_pages.max(1));
    }
}

/// Result of running the pipeline for one view state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageView {
    /// Records on the requested page, at most [`PAGE_SIZE`].
    pub rows: Vec<UserRecord>,
    /// `ceil(matched / PAGE_SIZE)`, zero when nothing matched.
    pub total_pages: usize,
    /// Records surviving the search filter.
    pub matched: usize,
}

/// Root-locale collator for names: accents and case only break ties, and
/// spaces and punctuation are not ignored.
fn name_collator() -> Collator {
    Collator::new(Tailoring::default(), false, true)
}

/// Locale-aware name comparison (Unicode collation, CLDR root order).
///
/// Base letters decide first, then accents, then case with lowercase first.
pub fn collate(a: &str, b: &str) -> Ordering {
    name_collator().collate(a, b)
}

/// Stable sort by name. Descending flips the comparator so equal names keep
/// their relative order in both directions.
pub fn sort_records(records: &mut [&UserRecord], order: SortOrder) {
    let mut collator = name_collator();
    match order {
        SortOrder::None => {}
        SortOrder::Ascending => records.sort_by(|a, b| collator.collate(&a.name, &b.name)),
        SortOrder::Descending => records.sort_by(|a, b| collator.collate(&b.name, &a.name)),
    }
}

pub const fn total_pages(matched: usize) -> usize {
    matched.div_ceil(PAGE_SIZE)
}

/// Slice out page `page_index` (1-based). Out-of-range pages are empty.
pub fn paginate<T: Clone>(items: &[T], page_index: usize) -> Vec<T> {
    let start = page_index.saturating_sub(1).saturating_mul(PAGE_SIZE);
    items.iter().skip(start).take(PAGE_SIZE).cloned().collect()
}

/// Run filter → sort → paginate over `records`.
pub fn transform(records: &[UserRecord], state: &ViewState) -> PageView {
    let mut filtered = apply_search(records, &state.search_text);
    sort_records(&mut filtered, state.sort_order);
    let matched = filtered.len();
    let rows = paginate(&filtered, state.page_index)
        .into_iter()
        .cloned()
        .collect();
    PageView {
        rows,
        total_pages: total_pages(matched),
        matched,
    }
}

/// Last computed page, reused while neither the records nor the view state change.
#[derive(Debug, Default)]
pub struct PageMemo {
    key: Option<(Ticket, ViewState)>,
    view: PageView,
}

impl PageMemo {
    pub fn get(&mut self, generation: Ticket, records: &[UserRecord], state: &ViewState) -> &PageView {
        let fresh = matches!(&self.key, Some((g, s)) if *g == generation && s == state);
        if !fresh {
            self.view = transform(records, state);
            self.key = Some((generation, state.clone()));
        }
        &self.view
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
