//! Askama templates for the thing pages.

use askama::Template;

use crate::models::ThingData;

use super::{AccessChoice, FormView, ListingView, TemplateContext};

/// Full listing page: layout, filter form and the list container.
#[derive(Template)]
#[template(path = "things/list.html")]
pub struct ThingListPage {
    pub ctx: TemplateContext,
    pub view: ListingView,
    pub access_choices: Vec<AccessChoice>,
}

/// The list container alone, swapped in place by HTMX.
#[derive(Template)]
#[template(path = "things/list_objects.html")]
pub struct ThingListFragment {
    pub view: ListingView,
}

#[derive(Template)]
#[template(path = "things/detail.html")]
pub struct ThingDetailPage {
    pub ctx: TemplateContext,
    pub thing: ThingData,
    pub edit_href: String,
    pub delete_href: String,
    pub can_change: bool,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "things/form.html")]
pub struct ThingFormPage {
    pub ctx: TemplateContext,
    pub view: FormView,
}
