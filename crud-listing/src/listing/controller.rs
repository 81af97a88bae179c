//! Listing orchestration

use std::collections::HashMap;

use crate::config::ListingConfig;
use crate::error::{Error, Result};
use crate::filters::{FilterSet, PAGE_PARAM};
use crate::htmx::PartialSignal;
use crate::pagination::{Page, PageMarker, Paginator, RequestedPage};
use crate::repository::{RecordQuery, Repository};

use super::RenderMode;

/// Everything a listing needs from the incoming request
#[derive(Debug, Clone, Default)]
pub struct ListingRequest {
    /// Requested page, as received
    pub page: RequestedPage,
    /// All query parameters; filters and `sort` are picked out of these
    pub params: HashMap<String, String>,
    pub signal: PartialSignal,
}

impl ListingRequest {
    /// Build from query parameters, taking the page from `page`
    #[must_use]
    pub fn from_params(params: HashMap<String, String>, signal: PartialSignal) -> Self {
        Self {
            page: params.get(PAGE_PARAM).cloned().into(),
            params,
            signal,
        }
    }

    #[must_use]
    pub fn page(mut self, page: impl Into<RequestedPage>) -> Self {
        self.page = page.into();
        self
    }
}

/// One rendered listing: the page, its navigation and the filter state
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub page: Page<T>,
    /// Navigation around `page.number`; render it as often as needed
    pub elided_range: Vec<PageMarker>,
    pub filters: FilterSet,
    /// Records in scope before filtering
    pub total_count: u64,
    /// Records left after filtering
    pub filtered_count: u64,
    pub render_mode: RenderMode,
}

/// Runs the listing pipeline against a record store
#[derive(Debug, Clone, Default)]
pub struct ListingController {
    config: ListingConfig,
}

impl ListingController {
    #[must_use]
    pub fn new(config: ListingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// List one team's records
    ///
    /// Applies the request's filters and ordering, then resolves the
    /// requested page against the filtered result. Under the default
    /// clamping strategy a bookmark to page 3 still lands on a real page
    /// after a filter leaves only one.
    ///
    /// # Errors
    ///
    /// - record store failures
    /// - [`Error::NotFound`] for a page past the end under
    ///   [`PageStrategy::Strict`](crate::pagination::PageStrategy::Strict)
    ///
    /// Malformed page numbers and filter values are always recovered from.
    pub async fn list<R: Repository>(
        &self,
        repo: &R,
        scope: &str,
        request: ListingRequest,
    ) -> Result<Listing<R::Entity>> {
        let base = RecordQuery::scoped(scope);
        let total_count = repo.count(&base).await?;

        let filters = FilterSet::from_params(&request.params);
        let view = filters.apply(repo, base);
        let filtered_count = view.count().await?;

        let paginator = Paginator::new(filtered_count, self.config.page_size)
            .orphans(self.config.orphans)
            .strategy(self.config.strategy);
        let window = paginator.page(&request.page).map_err(|err| {
            tracing::debug!(team = scope, requested = %request.page, "Rejected page under strict paging");
            Error::NotFound(format!("Invalid page ({}): {err}", request.page))
        })?;
        let items = view.slice(window.as_pagination()).await?;

        let elided_range = paginator.elided_page_range(
            window.number,
            self.config.on_each_side,
            self.config.on_ends,
        );
        let render_mode = RenderMode::decide(&request.signal, &self.config.container_id);

        tracing::debug!(
            team = scope,
            requested = %request.page,
            page = window.number,
            num_pages = window.num_pages,
            total_count,
            filtered_count,
            ?render_mode,
            "Listing resolved"
        );

        Ok(Listing {
            page: Page::new(items, window, self.config.page_size),
            elided_range,
            filters,
            total_count,
            filtered_count,
            render_mode,
        })
    }
}
