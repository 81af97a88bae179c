//! View data for the thing pages.
//!
//! Templates only read fields and loop; links, labels and counts are worked
//! out here.

use crate::access::{AccessLevel, Permission};
use crate::filters::{BoundFilter, SortChoice};
use crate::listing::Listing;
use crate::models::{FieldErrors, Thing, ThingForm, LOCKED1_DEFAULT, LOCKED2_DEFAULT};
use crate::pagination::PageMarker;

use super::helpers::{pluralize, truncate};

/// Longest name shown in a listing row before it is cut.
pub const ROW_NAME_CHARS: usize = 60;

/// One row of the listing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingRow {
    pub id: i64,
    pub name: String,
    pub number: i64,
    pub href: String,
}

impl From<&Thing> for ThingRow {
    fn from(thing: &Thing) -> Self {
        Self {
            id: thing.id,
            name: truncate(&thing.name, ROW_NAME_CHARS),
            number: thing.number,
            href: thing.absolute_url(),
        }
    }
}

/// One entry of the page navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    /// `None` for the current page and for gaps
    pub href: Option<String>,
    pub is_current: bool,
    pub is_gap: bool,
}

/// Everything the listing templates render.
#[derive(Debug, Clone)]
pub struct ListingView {
    /// Listing path without query string, e.g. `/teams/acme/things/`
    pub base_href: String,
    pub container_id: String,
    pub rows: Vec<ThingRow>,
    pub page_links: Vec<PageLink>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub summary: String,
    pub total_count: u64,
    pub filtered_count: u64,
    pub is_filtered: bool,
    pub filters: Vec<BoundFilter>,
    pub sort_choices: Vec<SortChoice>,
    /// Rows are listed at all (`view_summary_thing`)
    pub show_rows: bool,
    /// Rows show every column and link to their detail page (`view_thing`)
    pub show_details: bool,
    pub can_add: bool,
}

impl ListingView {
    #[must_use]
    pub fn new(
        listing: &Listing<Thing>,
        base_href: impl Into<String>,
        container_id: &str,
        access: AccessLevel,
    ) -> Self {
        let base_href = base_href.into();
        let page = &listing.page;
        let href = |n: u32| format!("{base_href}?{}", listing.filters.query_string(n));

        let page_links = listing
            .elided_range
            .iter()
            .map(|marker| match *marker {
                PageMarker::Page(n) => PageLink {
                    label: n.to_string(),
                    href: (n != page.number).then(|| href(n)),
                    is_current: n == page.number,
                    is_gap: false,
                },
                PageMarker::Ellipsis => PageLink {
                    label: marker.to_string(),
                    href: None,
                    is_current: false,
                    is_gap: true,
                },
            })
            .collect();

        let noun = pluralize(page.count, "thing", "things");
        let summary = if page.count == 0 {
            "No things found.".to_string()
        } else {
            format!(
                "Showing {}-{} of {} {noun}",
                page.start_index, page.end_index, page.count
            )
        };

        Self {
            rows: page.items.iter().map(ThingRow::from).collect(),
            page_links,
            previous_href: page.previous_page_number.map(href),
            next_href: page.next_page_number.map(href),
            summary,
            total_count: listing.total_count,
            filtered_count: listing.filtered_count,
            is_filtered: listing.filters.is_filtered(),
            filters: listing.filters.bound_values(),
            sort_choices: listing.filters.sort_choices(),
            show_rows: access.grants(Permission::ViewSummary),
            show_details: access.grants(Permission::View),
            can_add: access.grants(Permission::Add),
            container_id: container_id.to_string(),
            base_href,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One button of the access switch on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessChoice {
    pub level: u8,
    pub label: &'static str,
    /// Form action that switches the team to this level
    pub action: String,
    pub is_current: bool,
}

/// Buttons for every access level, `None` through `Delete`.
#[must_use]
pub fn access_choices(base_href: &str, current: AccessLevel) -> Vec<AccessChoice> {
    AccessLevel::all()
        .map(|level| AccessChoice {
            level: level.get(),
            label: level.highest().map_or("None", Permission::label),
            action: format!("{base_href}setperms/{level}"),
            is_current: level == current,
        })
        .collect()
}

/// A form value shown to the user but never accepted back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// A create or edit form with its submitted values and errors.
#[derive(Debug, Clone)]
pub struct FormView {
    pub action: String,
    pub submit_label: &'static str,
    pub form: ThingForm,
    pub errors: FieldErrors,
    pub locked: Vec<LockedField>,
}

impl FormView {
    /// A form whose locked fields show the values new records get.
    #[must_use]
    pub fn new(action: impl Into<String>, submit_label: &'static str, form: ThingForm) -> Self {
        Self {
            action: action.into(),
            submit_label,
            form,
            errors: FieldErrors::new(),
            locked: locked_fields(LOCKED1_DEFAULT, LOCKED2_DEFAULT),
        }
    }

    /// Show the locked values of an existing record.
    #[must_use]
    pub fn with_locked_from(mut self, thing: &Thing) -> Self {
        self.locked = locked_fields(&thing.locked1, &thing.locked2);
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    /// Messages for one field, empty when it validated.
    #[must_use]
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn locked_fields(first: &str, second: &str) -> Vec<LockedField> {
    vec![
        LockedField {
            name: "locked1",
            label: "Locked 1",
            value: first.to_string(),
        },
        LockedField {
            name: "locked2",
            label: "Locked 2",
            value: second.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::htmx::PartialSignal;
    use crate::listing::{ListingController, ListingRequest};
    use crate::repository::MemoryRepository;

    async fn listing(count: u32, params: &[(&str, &str)]) -> Listing<Thing> {
        let repo = MemoryRepository::new();
        repo.seed("acme", count).await.unwrap();
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListingController::default()
            .list(&repo, "acme", ListingRequest::from_params(params, PartialSignal::default()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_page_links_keep_filters() {
        let listing = listing(40, &[("page", "5"), ("sort", "-number")]).await;
        let view = ListingView::new(&listing, "/teams/acme/things/", "object-list", AccessLevel::FULL);

        let labels: Vec<_> = view.page_links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3", "4", "5", "6", "7", "…", "10"]);

        let current = view.page_links.iter().find(|l| l.is_current).unwrap();
        assert_eq!(current.label, "5");
        assert!(current.href.is_none());

        assert_eq!(
            view.page_links[0].href.as_deref(),
            Some("/teams/acme/things/?sort=-number&page=1")
        );
        assert!(view.page_links[7].is_gap);
        assert_eq!(
            view.next_href.as_deref(),
            Some("/teams/acme/things/?sort=-number&page=6")
        );
        assert_eq!(
            view.previous_href.as_deref(),
            Some("/teams/acme/things/?sort=-number&page=4")
        );
    }

    #[tokio::test]
    async fn test_summary() {
        let view = ListingView::new(&listing(10, &[("page", "3")]).await, "/", "object-list", AccessLevel::FULL);
        assert_eq!(view.summary, "Showing 9-10 of 10 things");
        assert!(view.next_href.is_none());

        let view = ListingView::new(&listing(1, &[]).await, "/", "object-list", AccessLevel::FULL);
        assert_eq!(view.summary, "Showing 1-1 of 1 thing");

        let view = ListingView::new(&listing(3, &[("name", "zzz")]).await, "/", "object-list", AccessLevel::FULL);
        assert_eq!(view.summary, "No things found.");
        assert!(view.is_empty());
        assert!(view.is_filtered);
        assert_eq!(view.total_count, 3);
    }

    #[tokio::test]
    async fn test_access_flags() {
        let listing = listing(3, &[]).await;

        let summary = ListingView::new(&listing, "/", "object-list", AccessLevel::SUMMARY);
        assert!(summary.show_rows);
        assert!(!summary.show_details);
        assert!(!summary.can_add);

        let none = ListingView::new(&listing, "/", "object-list", AccessLevel::NONE);
        assert!(!none.show_rows);

        let full = ListingView::new(&listing, "/", "object-list", AccessLevel::FULL);
        assert!(full.show_details && full.can_add);
    }

    #[test]
    fn test_access_choices() {
        let choices = access_choices("/teams/acme/things/", AccessLevel::SUMMARY);
        let labels: Vec<_> = choices.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["None", "Summary", "View", "Change", "Add", "Delete"]);
        assert_eq!(choices[5].action, "/teams/acme/things/setperms/5");

        let current: Vec<_> = choices.iter().filter(|c| c.is_current).map(|c| c.level).collect();
        assert_eq!(current, vec![1]);
    }

    #[test]
    fn test_form_shows_locked_defaults() {
        let view = FormView::new("/teams/acme/things/new", "Create", ThingForm::initial());
        let values: Vec<_> = view.locked.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec![LOCKED1_DEFAULT, LOCKED2_DEFAULT]);
    }

    #[test]
    fn test_form_errors_for() {
        let form = ThingForm::default();
        let errors = form.validate().unwrap_err();
        let view = FormView::new("/teams/acme/things/new", "Create", form).with_errors(errors);

        assert!(view.has_errors());
        assert_eq!(view.errors_for("name"), ["This field is required."]);
        assert!(view.errors_for("notes").is_empty());
    }
}
