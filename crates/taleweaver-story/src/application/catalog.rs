//! Paging through the story catalog.

use taleweaver_core::api::{StoryApi, StorySummary};
use taleweaver_core::error::ApiError;
use thiserror::Error;
use tracing::{instrument, warn};

/// Stories shown per catalog page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Failure to list a catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// list-stories failed.
    #[error("failed to load stories: {0}")]
    List(ApiError),
}

/// A 1-based catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Page `page` with `per_page` entries. Both are clamped to at least 1.
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// The first page.
    #[must_use]
    pub fn first(per_page: u64) -> Self {
        Self::new(1, per_page)
    }

    /// Page number, starting at 1.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Entries per page.
    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Entries preceding this page.
    #[must_use]
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// The following page.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::new(self.page.saturating_add(1), self.per_page)
    }

    /// The preceding page, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        (self.page > 1).then(|| Self::new(self.page - 1, self.per_page))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Number of pages needed for `total` entries.
#[must_use]
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1))
}

/// An entry in a pager strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A page that can be jumped to.
    Page(u64),
    /// A collapsed run of pages.
    Gap,
}

/// Pager strip for `current` out of `total` pages: the first and last
/// pages, the current page and its direct neighbours, with a gap marker
/// for each collapsed run.
#[must_use]
pub fn page_links(current: u64, total: u64) -> Vec<PageLink> {
    let mut pages = vec![
        1,
        current.saturating_sub(1),
        current,
        current.saturating_add(1),
        total,
    ];
    pages.retain(|page| (1..=total).contains(page));
    pages.sort_unstable();
    pages.dedup();

    let mut links = Vec::with_capacity(pages.len() * 2);
    let mut previous = 0;
    for page in pages {
        if page > previous + 1 {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(page));
        previous = page;
    }
    links
}

/// One page of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPage {
    /// The page that was requested.
    pub request: PageRequest,
    /// Stories on this page.
    pub stories: Vec<StorySummary>,
    /// Total number of stories, unknown if count-stories failed.
    pub total: Option<u64>,
}

impl StoryPage {
    /// Number of pages, if the total is known.
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.total
            .map(|total| total_pages(total, self.request.per_page()))
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.request.page() > 1
    }

    /// Whether a following page exists. Without a total, a full page is
    /// taken to mean there may be more.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match self.total_pages() {
            Some(pages) => self.request.page() < pages,
            None => self.stories.len() as u64 == self.request.per_page(),
        }
    }
}

/// Fetches one catalog page together with the total story count.
///
/// A failing count is tolerated and reported as an unknown total.
///
/// # Errors
///
/// Returns `CatalogError::List` if list-stories fails.
#[instrument(skip(api), fields(page = request.page(), per_page = request.per_page()))]
pub async fn fetch_page(
    request: PageRequest,
    api: &dyn StoryApi,
) -> Result<StoryPage, CatalogError> {
    let (stories, count) = tokio::join!(
        api.list_stories(request.skip(), request.per_page()),
        api.count_stories()
    );

    let stories = stories.map_err(CatalogError::List)?;
    let total = match count {
        Ok(count) => Some(count.count),
        Err(err) => {
            warn!(error = %err, "failed to count stories");
            None
        }
    };

    Ok(StoryPage {
        request,
        stories,
        total,
    })
}
