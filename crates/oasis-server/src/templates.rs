//! HTML templates for the demo authorization flow.
//!
//! Every page is a `GET` form posting back to the authorization endpoint:
//! the request parameters travel as hidden fields and `stage` tells the
//! decoder which handler comes next.

use oasis_auth::{AuthorizeRequest, AuthorizeStage};

/// Shared CSS styles for all pages.
const SHARED_STYLES: &str = r#"
:root {
    --brand-primary: #0f766e;
    --brand-primary-light: #14b8a6;
    --brand-fire: #dc2626;
    --brand-fire-bg: rgba(220, 38, 38, 0.1);
    --surface-1: #f8fafc;
    --surface-2: #ffffff;
    --text-primary: #0f172a;
    --text-secondary: #475569;
    --text-dimmed: #94a3b8;
    --border-subtle: #e2e8f0;
    --radius-md: 6px;
    --radius-xl: 12px;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: var(--surface-1);
    min-height: 100vh;
    display: flex;
    justify-content: center;
    align-items: center;
    color: var(--text-primary);
    line-height: 1.5;
}

.container {
    width: 100%;
    max-width: 420px;
    padding: 1rem;
}

.card {
    background: var(--surface-2);
    border: 1px solid var(--border-subtle);
    border-radius: var(--radius-xl);
    padding: 1.5rem;
}

.card-title {
    font-size: 1.25rem;
    font-weight: 600;
    margin-bottom: 1rem;
}

.form-group {
    margin-bottom: 1rem;
}

.form-label {
    display: block;
    font-size: 0.875rem;
    font-weight: 500;
    color: var(--text-secondary);
    margin-bottom: 0.25rem;
}

.form-input {
    width: 100%;
    padding: 0.625rem 0.75rem;
    border: 1px solid var(--border-subtle);
    border-radius: var(--radius-md);
    font-size: 0.875rem;
}

.btn {
    width: 100%;
    padding: 0.625rem 1rem;
    border: none;
    border-radius: var(--radius-md);
    font-size: 0.875rem;
    font-weight: 500;
    cursor: pointer;
}

.btn-primary {
    background: var(--brand-primary);
    color: white;
}

.btn-primary:hover {
    background: var(--brand-primary-light);
}

.btn-danger {
    background: transparent;
    border: 1px solid var(--border-subtle);
    color: var(--text-secondary);
}

.btn-group {
    display: flex;
    gap: 0.75rem;
    margin-top: 1rem;
}

.alert {
    padding: 0.75rem 1rem;
    border-radius: var(--radius-md);
    font-size: 0.875rem;
    margin-bottom: 1rem;
}

.alert-error {
    background: var(--brand-fire-bg);
    border: 1px solid var(--brand-fire);
    color: var(--brand-fire);
}

.scope-list {
    list-style: none;
    margin-bottom: 1rem;
}

.scope-list li {
    padding: 0.5rem 0;
    border-bottom: 1px solid var(--border-subtle);
    font-size: 0.875rem;
}

.error-code {
    font-family: "SF Mono", monospace;
    font-size: 0.75rem;
    color: var(--text-dimmed);
}
"#;

/// Base HTML template wrapper.
fn html_page(title: &str, content: &str) -> String {
    let mut html = String::with_capacity(content.len() + 2000);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <title>");
    html.push_str(&html_escape(title));
    html.push_str(" - Oasis</title>\n");
    html.push_str("    <style>");
    html.push_str(SHARED_STYLES);
    html.push_str("</style>\n</head>\n<body>\n    <div class=\"container\">\n");
    html.push_str(content);
    html.push_str("\n    </div>\n</body>\n</html>");
    html
}

fn hidden_field(content: &mut String, name: &str, value: &str) {
    content.push_str("<input type=\"hidden\" name=\"");
    content.push_str(name);
    content.push_str("\" value=\"");
    content.push_str(&html_escape(value));
    content.push_str("\">\n");
}

/// Hidden fields carrying the authorization request to `next` stage.
fn request_fields(content: &mut String, request: &AuthorizeRequest, next: AuthorizeStage) {
    hidden_field(content, "response_type", &request.response_type);
    hidden_field(content, "client_id", &request.client_id);
    if !request.redirect_uri.is_empty() {
        hidden_field(content, "redirect_uri", &request.redirect_uri);
    }
    if !request.scope.is_empty() {
        hidden_field(content, "scope", &request.scope);
    }
    if !request.state.is_empty() {
        hidden_field(content, "state", &request.state);
    }
    hidden_field(content, "stage", &next.value().to_string());
}

/// Renders the login form.
///
/// Submitting it moves the request to [`AuthorizeStage::TO_AUTHENTICATE`].
pub fn render_login_form(request: &AuthorizeRequest, error: Option<&str>) -> String {
    let mut content = String::with_capacity(2048);

    content.push_str("<div class=\"card\">\n");
    content.push_str("<div class=\"card-title\">Sign in to ");
    content.push_str(&html_escape(&request.client_id));
    content.push_str("</div>\n\n");

    if let Some(e) = error {
        content.push_str("<div class=\"alert alert-error\">");
        content.push_str(&html_escape(e));
        content.push_str("</div>\n\n");
    }

    content.push_str("<form method=\"GET\">\n");
    request_fields(&mut content, request, AuthorizeStage::TO_AUTHENTICATE);

    content.push_str("<div class=\"form-group\">\n");
    content.push_str("<label class=\"form-label\" for=\"username\">Username</label>\n");
    content
        .push_str("<input type=\"text\" id=\"username\" name=\"username\" class=\"form-input\" ");
    content.push_str("placeholder=\"Enter your username\" required autocomplete=\"username\">\n");
    content.push_str("</div>\n\n");

    content.push_str("<button type=\"submit\" class=\"btn btn-primary\">Sign in</button>\n");
    content.push_str("</form>\n</div>");

    html_page("Sign In", &content)
}

/// Renders the consent form for an authenticated user.
///
/// Both buttons move the request to [`AuthorizeStage::TO_AUTHORIZE`]; the
/// `decision` field tells them apart.
pub fn render_consent_form(request: &AuthorizeRequest) -> String {
    let mut content = String::with_capacity(2048);

    content.push_str("<div class=\"card\">\n");
    content.push_str("<div class=\"card-title\">");
    content.push_str(&html_escape(&request.client_id));
    content.push_str(" wants to access your account</div>\n\n");

    content.push_str("<p class=\"form-label\">Signed in as ");
    content.push_str(&html_escape(&request.user_id));
    content.push_str("</p>\n\n");

    let scopes: Vec<&str> = request.scopes().collect();
    if !scopes.is_empty() {
        content.push_str("<ul class=\"scope-list\">\n");
        for scope in scopes {
            content.push_str("<li>");
            content.push_str(&html_escape(scope));
            content.push_str("</li>\n");
        }
        content.push_str("</ul>\n\n");
    }

    content.push_str("<form method=\"GET\">\n");
    request_fields(&mut content, request, AuthorizeStage::TO_AUTHORIZE);
    hidden_field(&mut content, "username", &request.user_id);

    content.push_str("<div class=\"btn-group\">\n");
    content.push_str(
        "<button type=\"submit\" name=\"decision\" value=\"deny\" class=\"btn btn-danger\">Deny</button>\n",
    );
    content.push_str(
        "<button type=\"submit\" name=\"decision\" value=\"approve\" class=\"btn btn-primary\">Authorize</button>\n",
    );
    content.push_str("</div>\n</form>\n</div>");

    html_page("Authorize", &content)
}

/// Renders an error page for requests that cannot be redirected back.
pub fn render_error_page(error_code: &str, error_description: &str) -> String {
    let mut content = String::with_capacity(1024);

    content.push_str("<div class=\"card\">\n");
    content.push_str("<div class=\"card-title\">Authorization Error</div>\n\n");
    content.push_str("<div class=\"alert alert-error\">");
    content.push_str(&html_escape(error_description));
    content.push_str("</div>\n\n");
    content.push_str("<div class=\"error-code\">");
    content.push_str(&html_escape(error_code));
    content.push_str("</div>\n</div>");

    html_page("Error", &content)
}

/// Simple HTML escaping to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AuthorizeRequest {
        AuthorizeRequest {
            response_type: "code".into(),
            client_id: "Test App".into(),
            redirect_uri: "https://example.com/callback".into(),
            scope: "profile email".into(),
            state: "s\"1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_login_form_with_error() {
        let html = render_login_form(&request(), Some("Username is required"));
        assert!(html.contains("Sign in to Test App"));
        assert!(html.contains("Username is required"));
        assert!(html.contains("alert-error"));
        assert!(html.contains("<input type=\"hidden\" name=\"stage\" value=\"1\">"));
        assert!(html.contains("value=\"s&quot;1\""));
    }

    #[test]
    fn test_render_consent_form() {
        let mut request = request();
        request.user_id = "alice".into();
        let html = render_consent_form(&request);
        assert!(html.contains("Signed in as alice"));
        assert!(html.contains("<li>profile</li>"));
        assert!(html.contains("<li>email</li>"));
        assert!(html.contains("<input type=\"hidden\" name=\"stage\" value=\"3\">"));
        assert!(html.contains("<input type=\"hidden\" name=\"username\" value=\"alice\">"));
        assert!(html.contains("value=\"approve\""));
    }

    #[test]
    fn test_render_error_page() {
        let html = render_error_page("invalid_request", "redirect_uri not set");
        assert!(html.contains("invalid_request"));
        assert!(html.contains("redirect_uri not set"));
        assert!(html.contains("Authorization Error"));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = AuthorizeRequest {
            response_type: "code".into(),
            client_id: "c".into(),
            ..Default::default()
        };
        let html = render_login_form(&request, None);
        assert!(!html.contains("name=\"redirect_uri\""));
        assert!(!html.contains("name=\"state\""));
        assert!(!html.contains("alert-error"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a&b"), "a&amp;b");
        assert_eq!(html_escape("'quoted'"), "&#39;quoted&#39;");
    }
}
