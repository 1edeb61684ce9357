use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use oasis_server::{AppConfig, build_app};
use tower::ServiceExt;

const CLIENT: &str =
    "response_type=code&client_id=demo-app&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb&state=xyz";

fn app() -> Router {
    let mut cfg = AppConfig::default();
    cfg.auth.allowed_response_types = vec!["code".into(), "token".into()];
    build_app(&cfg)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = get(&app(), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn code_flow_walks_every_stage() {
    let app = app();

    // login page
    let response = get(&app, &format!("/oauth/authorize?{CLIENT}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    let html = body_string(response).await;
    assert!(html.contains("Sign in to demo-app"));
    assert!(html.contains("<input type=\"hidden\" name=\"stage\" value=\"1\">"));

    // consent page
    let response = get(&app, &format!("/oauth/authorize?{CLIENT}&stage=1&username=alice")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Signed in as alice"));
    assert!(html.contains("<input type=\"hidden\" name=\"stage\" value=\"3\">"));

    // approval
    let response = get(
        &app,
        &format!("/oauth/authorize?{CLIENT}&stage=3&username=alice&decision=approve"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let loc = location(&response);
    assert!(loc.starts_with("https://app.example.com/cb?code="), "{loc}");
    assert!(loc.ends_with("&state=xyz"), "{loc}");
    assert!(body_string(response).await.is_empty());
}

#[tokio::test]
async fn implicit_flow_answers_in_fragment() {
    let response = get(
        &app(),
        "/oauth/authorize?response_type=token&client_id=spa&redirect_uri=https%3A%2F%2Fspa.example.com%2F&scope=read&stage=3&username=bob&decision=approve",
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let loc = location(&response);
    assert!(loc.starts_with("https://spa.example.com/#access_token="), "{loc}");
    assert!(loc.ends_with("&expires_in=3600&scope=read&token_type=Bearer"), "{loc}");
}

#[tokio::test]
async fn existing_redirect_query_is_merged_and_sorted() {
    let response = get(
        &app(),
        "/oauth/authorize?response_type=code&client_id=c&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb%3Fz%3D1%26a%3D2&stage=3&username=alice&decision=deny",
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "https://app.example.com/cb?a=2&error=access_denied&z=1"
    );
}

#[tokio::test]
async fn missing_response_type_shows_error_page() {
    let response = get(&app(), "/oauth/authorize?client_id=demo-app").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::LOCATION).is_none());
    let html = body_string(response).await;
    assert!(html.contains("response_type is required but not set"));
    assert!(html.contains("invalid_request"));
}

#[tokio::test]
async fn relative_redirect_uri_is_rejected() {
    let response = get(
        &app(),
        "/oauth/authorize?response_type=code&client_id=demo-app&redirect_uri=%2Fcb",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_string(response).await;
    assert!(
        html.contains("redirect_uri is misformed. expected a full URI but got &quot;/cb&quot;")
    );
}

#[tokio::test]
async fn unsupported_response_type_redirects_to_client() {
    let cfg = AppConfig::default();
    let app = build_app(&cfg);

    let response = get(
        &app,
        "/oauth/authorize?response_type=token&client_id=spa&redirect_uri=https%3A%2F%2Fspa.example.com%2Fcb&state=s1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let loc = location(&response);
    assert!(
        loc.starts_with("https://spa.example.com/cb?error=unsupported_response_type&"),
        "{loc}"
    );
    assert!(loc.ends_with("&state=s1"));
}

#[tokio::test]
async fn unregistered_stage_is_internal_error() {
    let response = get(&app(), &format!("/oauth/authorize?{CLIENT}&stage=2")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal Server Error");
}

#[tokio::test]
async fn post_is_served() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/oauth/authorize?{CLIENT}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn redirect_uri_without_written_host_is_rejected() {
    for redirect_uri in ["https%3Aapp.example.com%2Fcb", "https%3A%2F%2F%2Fapp.example.com%2Fcb"] {
        let response = get(
            &app(),
            &format!("/oauth/authorize?response_type=code&client_id=c&redirect_uri={redirect_uri}"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::LOCATION).is_none());
        let html = body_string(response).await;
        assert!(html.contains("expected a full URI"), "{html}");
    }
}
