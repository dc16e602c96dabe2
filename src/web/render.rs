use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::errors::ServiceError;

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps `body` in the shared page chrome. `title` is escaped, `body` is not.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a></nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        body = body,
    ))
}

/// Renders an error message above the form it belongs to.
pub fn error_banner(message: Option<&str>) -> String {
    message
        .map(|m| format!("<p class=\"field-error\">{}</p>\n", escape(m)))
        .unwrap_or_default()
}

/// Service errors rendered as an HTML page with the mapped status code.
#[derive(Debug)]
pub struct PageError(pub ServiceError);

impl From<ServiceError> for PageError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            error!(error = %self.0, "page request failed");
        }
        let reason = status.canonical_reason().unwrap_or("Error");
        let body = format!(
            "<h1>{} {}</h1>\n<p>{}</p>",
            status.as_u16(),
            escape(reason),
            escape(&self.0.response_message())
        );
        (status, page(reason, &body)).into_response()
    }
}

pub type PageResult<T = Response> = Result<T, PageError>;

/// A page rendered with a non-200 status, e.g. a form re-rendered after
/// failed validation.
pub fn page_with_status(status: StatusCode, title: &str, body: &str) -> Response {
    (status, page(title, body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(
            escape("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn page_escapes_title_only() {
        let Html(html) = page("<b>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;b&gt;</title>"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[tokio::test]
    async fn page_error_uses_mapped_status() {
        let response = PageError(ServiceError::IllegalState("already shipped".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("409 Conflict"));
        assert!(html.contains("already shipped"));
    }

    #[tokio::test]
    async fn internal_errors_are_not_leaked() {
        let response =
            PageError(ServiceError::InternalError("secret detail".into())).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(!html.contains("secret detail"));
    }
}
