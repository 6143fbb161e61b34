/* src/server/adapter/axum/src/handler/tests.rs */

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::{get, post};
use forecourt_engine::{
  DealerConfig, DealerData, MetricsCollector, Scope, SectionError, SectionRegistry,
};
use forecourt_server::{ApiClient, DealerSession, ForecourtServer, SessionProvider};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;

fn config() -> DealerConfig {
  serde_json::from_value(json!({
    "pages": [
      {"pageName": "home", "path": "/", "title": "{companyName} | Used cars", "sections": [
        {"folderName": "hero", "isShared": true, "variant": "HeroBanner", "props": {"heading": "Welcome"}},
        {"folderName": "hero", "isShared": true, "variant": "Nope"},
        {"folderName": "stock-list", "isShared": true, "variant": "StockGrid", "loader": {"path": "/api/stock"}},
        {"folderName": "trusted-partner", "isShared": true, "variant": "PartnerGrid"},
        {"folderName": "contact", "isShared": true, "variant": "ContactDetails"}
      ]},
      {"pageName": "finance", "path": "/finance", "sections": [
        {"folderName": "representative-example", "variant": "RepresentativeExample",
         "props": {"totalCash": 12000, "deposit": 0, "apr": 9.9, "nbrOfMonths": 48}}
      ]},
      {"pageName": "contact", "path": "/contact", "sections": [
        {"folderName": "stock-list", "isShared": true, "variant": "StockGrid", "loader": {"path": "/api/missing"}},
        {"folderName": "contact", "isShared": true, "variant": "ContactDetails"}
      ]}
    ]
  }))
  .unwrap()
}

async fn spawn_backend() -> String {
  let router = axum::Router::new()
    .route(
      "/api/stock",
      get(|| async {
        axum::Json(json!([{"id": "V1", "make": "Ford", "model": "Fiesta", "price": 8995}]))
      }),
    )
    .route(
      "/api/appointments",
      post(|axum::Json(body): axum::Json<Value>| async move {
        axum::Json(json!({"id": 7, "echo": body}))
      }),
    )
    .route(
      "/api/sell-car",
      post(|mut multipart: axum::extract::Multipart| async move {
        let mut files = 0;
        while let Some(field) = multipart.next_field().await.unwrap() {
          if field.file_name().is_some() {
            files += 1;
          }
        }
        axum::Json(json!({"files": files}))
      }),
    );
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, router).await.unwrap();
  });
  format!("http://{addr}")
}

fn ready(dealer: Value) -> SessionProvider {
  SessionProvider::ready(DealerSession {
    auth_token: "auth-abc".into(),
    dealer: serde_json::from_value::<DealerData>(dealer).unwrap(),
  })
}

fn router_with(
  api: ApiClient,
  session: SessionProvider,
  metrics: Arc<MetricsCollector>,
) -> axum::Router {
  build_router(ForecourtServer::new(config(), api, session).metrics(metrics).into_parts())
}

async fn body_text(response: axum::response::Response) -> String {
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get_path(router: axum::Router, path: &str) -> axum::response::Response {
  router.oneshot(Request::get(path).body(Body::empty()).unwrap()).await.unwrap()
}

async fn post_json(router: axum::Router, path: &str, body: Value) -> axum::response::Response {
  let request = Request::post(path)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  router.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn home_renders_sections_in_config_order() {
  let metrics = Arc::new(MetricsCollector::new());
  let api = ApiClient::new(spawn_backend().await);
  let session = ready(json!({"companyName": "Acme", "FCANumber": "123"}));
  let router = router_with(api, session, metrics.clone());

  let response = get_path(router, "/").await;
  assert_eq!(response.status(), StatusCode::OK);
  let html = body_text(response).await;

  assert!(html.contains("<title>Acme | Used cars</title>"));
  let hero = html.find("<h1>Welcome</h1>").unwrap();
  let missing = html.find(r#"variant &quot;Nope&quot; not found in sections/shared/hero"#).unwrap();
  let stock = html.find("<h3>Ford Fiesta</h3>").unwrap();
  let partner = html.find(r#"class="trusted-partner""#).unwrap();
  assert!(hero < missing && missing < stock && stock < partner);
  assert!(html.contains(r#"href="/finance""#));

  let summary = metrics.summary();
  assert_eq!(summary["section.failed"].count, 1);
  assert_eq!(summary["page.render_ms"].count, 1);
}

#[tokio::test]
async fn no_fca_number_hides_finance_and_partner() {
  let router = router_with(
    ApiClient::new(spawn_backend().await),
    ready(json!({"companyName": "Acme", "FCANumber": null})),
    Arc::new(MetricsCollector::new()),
  );
  let html = body_text(get_path(router.clone(), "/").await).await;
  assert!(!html.contains(r#"href="/finance""#));
  assert!(!html.contains(r#"class="trusted-partner""#));

  assert_eq!(get_path(router, "/finance").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pages_endpoint_lists_navigable_pages() {
  let router = router_with(
    ApiClient::new("http://127.0.0.1:9"),
    ready(json!({"companyName": "Acme"})),
    Arc::new(MetricsCollector::new()),
  );
  let response = get_path(router, "/_forecourt/pages").await;
  assert_eq!(response.status(), StatusCode::OK);
  let pages: Value = serde_json::from_str(&body_text(response).await).unwrap();
  let names: Vec<&str> =
    pages.as_array().unwrap().iter().map(|p| p["pageName"].as_str().unwrap()).collect();
  assert_eq!(names, ["home", "contact"]);
  assert_eq!(pages[0]["title"], "Acme | Used cars");
}

#[tokio::test]
async fn failed_loader_is_local_to_its_section() {
  let router = router_with(
    ApiClient::new(spawn_backend().await),
    ready(json!({"companyName": "Acme", "phone": "0113 496 0000"})),
    Arc::new(MetricsCollector::new()),
  );
  let response = get_path(router, "/contact/").await;
  assert_eq!(response.status(), StatusCode::OK);
  let html = body_text(response).await;
  assert!(html.contains("loader failed"));
  assert!(html.contains(r#"class="contact""#));
}

#[tokio::test]
async fn loaders_run_concurrently_and_keep_config_order() {
  let backend = axum::Router::new()
    .route(
      "/api/stock/slow",
      get(|| async {
        tokio::time::sleep(Duration::from_millis(400)).await;
        axum::Json(json!([{"id": "S1", "make": "Ford", "model": "Focus"}]))
      }),
    )
    .route(
      "/api/stock/fast",
      get(|| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        axum::Json(json!([{"id": "F1", "make": "Vauxhall", "model": "Corsa"}]))
      }),
    );
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, backend).await.unwrap();
  });

  let config: DealerConfig = serde_json::from_value(json!({
    "pages": [{"pageName": "home", "path": "/", "sections": [
      {"folderName": "stock-list", "isShared": true, "variant": "StockGrid", "loader": {"path": "/api/stock/slow"}},
      {"folderName": "stock-list", "isShared": true, "variant": "StockGrid", "loader": {"path": "/api/stock/fast"}}
    ]}]
  }))
  .unwrap();
  let server = ForecourtServer::new(
    config,
    ApiClient::new(format!("http://{addr}")),
    ready(json!({"companyName": "Acme"})),
  );
  let router = build_router(server.into_parts());

  let started = Instant::now();
  let response = get_path(router, "/").await;
  let elapsed = started.elapsed();
  assert_eq!(response.status(), StatusCode::OK);
  let html = body_text(response).await;

  let slow = html.find("<h3>Ford Focus</h3>").unwrap();
  let fast = html.find("<h3>Vauxhall Corsa</h3>").unwrap();
  assert!(slow < fast);
  assert!(elapsed < Duration::from_millis(600), "loaders ran sequentially: {elapsed:?}");
}

#[tokio::test]
async fn finance_page_renders_representative_example() {
  let router = router_with(
    ApiClient::new("http://127.0.0.1:9"),
    ready(json!({"companyName": "Acme", "FCANumber": "123"})),
    Arc::new(MetricsCollector::new()),
  );
  let html = body_text(get_path(router, "/finance").await).await;
  assert!(html.contains("<dt>Monthly payment</dt><dd>\u{a3}303.78</dd>"));
  assert!(html.contains("<dt>Optional final payment</dt><dd>\u{a3}151.89</dd>"));
}

#[tokio::test]
async fn loading_and_failed_sessions() {
  let loading = SessionProvider::new(ApiClient::new("http://127.0.0.1:9"), "tok", "claim");
  let router = router_with(
    ApiClient::new("http://127.0.0.1:9"),
    loading.clone(),
    Arc::new(MetricsCollector::new()),
  );
  let response = get_path(router.clone(), "/").await;
  assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(response.headers()[header::RETRY_AFTER], "2");
  let pages = get_path(router.clone(), "/_forecourt/pages").await;
  assert_eq!(pages.status(), StatusCode::SERVICE_UNAVAILABLE);

  loading.bootstrap().await;
  let response = get_path(router.clone(), "/contact").await;
  assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
  let html = body_text(response).await;
  assert!(html.contains(r#"action="/_forecourt/session/retry""#));

  let retry = Request::post("/_forecourt/session/retry").body(Body::empty()).unwrap();
  let response = router.oneshot(retry).await.unwrap();
  assert_eq!(response.status(), StatusCode::SEE_OTHER);
  assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn finance_quote_silent_and_strict() {
  let router = router_with(
    ApiClient::new("http://127.0.0.1:9"),
    ready(json!({"companyName": "Acme"})),
    Arc::new(MetricsCollector::new()),
  );
  let body = json!({"totalCash": 37537, "deposit": 3527, "apr": 5.9, "nbrOfMonths": 24});
  let response = post_json(router.clone(), "/_forecourt/finance/quote", body).await;
  assert_eq!(response.status(), StatusCode::OK);
  let summary: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(summary["calculations"]["monthlyPayment"], 1505.81);
  assert_eq!(summary["formatted"]["totalAmountPayable"], "\u{a3}36,892.35");

  let degenerate = json!({"totalCash": 1000, "deposit": 0, "apr": 5.9, "nbrOfMonths": 0});
  let response = post_json(router.clone(), "/_forecourt/finance/quote", degenerate.clone()).await;
  let summary: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(summary["calculations"]["monthlyPayment"], 0.0);

  let response = post_json(router, "/_forecourt/finance/quote?strict=true", degenerate).await;
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let error: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn form_steps_and_forwarding() {
  let router = router_with(
    ApiClient::new(spawn_backend().await),
    ready(json!({"companyName": "Acme"})),
    Arc::new(MetricsCollector::new()),
  );

  let step_one = json!({"appointmentType": "test-drive", "date": "2026-03-14"});
  let response = post_json(router.clone(), "/_forecourt/forms/appointment?step=1", step_one).await;
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["errors"][0]["field"], "time");
  assert_eq!(body["error"]["message"], "Please choose a time slot");

  let complete = json!({
    "appointmentType": "test-drive", "date": "2026-03-14", "time": "10:30",
    "name": "Sam", "email": "sam@example.com", "phone": "07700 900123"
  });
  let response =
    post_json(router.clone(), "/_forecourt/forms/appointment?step=1", complete.clone()).await;
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["next"], 2);

  let response = post_json(router.clone(), "/_forecourt/forms/appointment", complete).await;
  assert_eq!(response.status(), StatusCode::OK);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["data"]["id"], 7);
  assert_eq!(body["data"]["echo"]["name"], "Sam");

  let response = post_json(router, "/_forecourt/forms/newsletter", json!({})).await;
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sell_car_multipart_forwards_photos() {
  let router = router_with(
    ApiClient::new(spawn_backend().await),
    ready(json!({"companyName": "Acme"})),
    Arc::new(MetricsCollector::new()),
  );
  let boundary = "XBOUNDARYX";
  let mut body = String::new();
  for (name, value) in [
    ("registration", "AB12 CDE"),
    ("mileage", "42000"),
    ("condition", "Good"),
    ("name", "Sam"),
    ("email", "sam@example.com"),
    ("phone", "07700900123"),
  ] {
    body.push_str(&format!(
      "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    ));
  }
  body.push_str(&format!(
    "--{boundary}\r\nContent-Disposition: form-data; name=\"photos\"; filename=\"front.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--{boundary}--\r\n"
  ));
  let request = Request::post("/_forecourt/forms/sell-car")
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
    .body(Body::from(body))
    .unwrap();
  let response = router.oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(body["data"]["files"], 1);
}

#[tokio::test]
async fn custom_sections_and_metrics_endpoint() {
  let metrics = Arc::new(MetricsCollector::new());
  let extra = SectionRegistry::new()
    .register(Scope::Shared, "hero", "Nope", |_| Err(SectionError::new("renderer exploded")));
  let server = ForecourtServer::new(
    config(),
    ApiClient::new(spawn_backend().await),
    ready(json!({"companyName": "Acme"})),
  )
  .sections(extra)
  .metrics(metrics);
  let router = build_router(server.into_parts());

  let html = body_text(get_path(router.clone(), "/").await).await;
  assert!(html.contains("renderer exploded"));

  let response = get_path(router.clone(), "/_forecourt/metrics").await;
  let summary: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(summary["section.failed"]["count"], 1);

  let response = get_path(router, "/_forecourt/health").await;
  let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
  assert_eq!(health["session"], "ready");
}
