//! Common data for every rendered page.

/// Data the layout needs regardless of which page is rendered.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Template)]
/// #[template(path = "things/detail.html")]
/// struct ThingDetailPage {
///     ctx: TemplateContext,
///     thing: ThingData,
/// }
///
/// let ctx = TemplateContext::new("Widget")
///     .with_path("/teams/acme/things/7")
///     .with_team("acme");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Page title, shown in `<title>` and as the heading.
    pub title: String,

    /// Current request path (for navigation highlighting).
    pub current_path: String,

    /// Team the page belongs to, if any.
    pub team: Option<String>,
}

impl TemplateContext {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the current request path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.current_path = path.into();
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Link to the team's listing, or `/` outside a team.
    #[must_use]
    pub fn list_href(&self) -> String {
        match &self.team {
            Some(team) => format!("/teams/{team}/things/"),
            None => "/".to_string(),
        }
    }

    /// Whether the page being rendered is the team's listing.
    #[must_use]
    pub fn on_list_page(&self) -> bool {
        self.team.is_some() && self.current_path == self.list_href()
    }
}
