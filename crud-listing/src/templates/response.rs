//! Template response wrapper.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Wrapper for rendering templates as HTML responses.
///
/// Adds control over the status code. Rendering failures become
/// [`Error::Template`](crate::Error::Template) responses.
///
/// # Example
///
/// ```rust,ignore
/// HtmlTemplate::new(ThingFormPage { ctx, form })
///     .with_status(StatusCode::UNPROCESSABLE_ENTITY)
/// ```
pub struct HtmlTemplate<T: Template> {
    template: T,
    status: StatusCode,
}

impl<T: Template> HtmlTemplate<T> {
    /// Create a new HTML template response.
    #[must_use]
    pub fn new(template: T) -> Self {
        Self {
            template,
            status: StatusCode::OK,
        }
    }

    /// Set the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(err) => crate::Error::Template(err).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Template)]
    #[template(source = "<p>Hello, {{ name }}!</p>", ext = "html")]
    struct TestTemplate {
        name: String,
    }

    fn hello(name: &str) -> HtmlTemplate<TestTemplate> {
        HtmlTemplate::new(TestTemplate {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_html_template_render() {
        let response = hello("Test").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_html_template_escapes() {
        let body = hello("<b>").into_response().into_body();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.starts_with("<p>Hello, "));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_html_template_custom_status() {
        let response = hello("Test")
            .with_status(StatusCode::UNPROCESSABLE_ENTITY)
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
