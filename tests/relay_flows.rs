//! End-to-end tests for `/jenkins/webhook`: the router talks to a mocked Jenkins that
//! also plays the `webhook-step` receiver.

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use jenkins_webhook_relay::{
    Client, DUPLICATE_CLICK_MESSAGE, Relay, WebhookNotifier, create_router,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn router(jenkins: &MockServer) -> Result<Router> {
    let client = Client::builder(jenkins.uri())?
        .auth_basic("user", "token")
        .build()?;
    let notifier = WebhookNotifier::new(jenkins.uri(), "hook-token")?;
    Ok(create_router(Relay::new(client, notifier)))
}

async fn mock_build_result(server: &MockServer, job: &str, build: u32, result: Value) {
    let building = result.is_null();
    Mock::given(method("GET"))
        .and(path(format!("/job/{job}/{build}/api/json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": build,
            "result": result,
            "building": building
        })))
        .mount(server)
        .await;
}

async fn expect_webhook(server: &MockServer, webhook_id: &str, job_type: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/webhook-step/{webhook_id}")))
        .and(header("Authorization", "hook-token"))
        .and(body_json(json!({ "type": job_type })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(times)
        .mount(server)
        .await;
}

async fn expect_no_webhook(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

async fn call(app: Router, http_method: &str, query: &str) -> Result<(StatusCode, String)> {
    let request = Request::builder()
        .method(http_method)
        .uri(format!("/jenkins/webhook?{query}"))
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(body.to_vec())?))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn running_build_fires_webhook_once_and_echoes_job_type() -> Result<()> {
    let jenkins = MockServer::start().await;
    mock_build_result(&jenkins, "app", 12, Value::Null).await;
    expect_webhook(&jenkins, "hook-7", "deploy", 1).await;

    let (status, body) = call(
        router(&jenkins)?,
        "GET",
        "webhookId=hook-7&jobType=deploy&jobName=app&buildNumber=12",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "deploy");
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn post_requests_are_relayed_too() -> Result<()> {
    let jenkins = MockServer::start().await;
    mock_build_result(&jenkins, "app", 4, Value::Null).await;
    expect_webhook(&jenkins, "hook-4", "test", 1).await;

    let (_, body) = call(
        router(&jenkins)?,
        "POST",
        "webhookId=hook-4&jobType=test&jobName=app&buildNumber=4",
    )
    .await?;

    assert_eq!(body, "test");
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn finished_build_answers_duplicate_message_without_webhook() -> Result<()> {
    let jenkins = MockServer::start().await;
    mock_build_result(&jenkins, "app", 12, json!("SUCCESS")).await;
    expect_no_webhook(&jenkins).await;

    let (status, body) = call(
        router(&jenkins)?,
        "GET",
        "webhookId=hook-7&jobType=deploy&jobName=app&buildNumber=12",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, DUPLICATE_CLICK_MESSAGE);
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lookup_failure_echoes_error_text_without_webhook() -> Result<()> {
    let jenkins = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/ghost/3/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&jenkins)
        .await;
    expect_no_webhook(&jenkins).await;

    let (status, body) = call(
        router(&jenkins)?,
        "GET",
        "webhookId=hook-7&jobType=deploy&jobName=ghost&buildNumber=3",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "HTTP 404 Not Found (GET /job/ghost/3/api/json)");
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bad_build_number_dumps_job_info_without_lookup() -> Result<()> {
    let jenkins = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&jenkins)
        .await;

    let (status, body) = call(
        router(&jenkins)?,
        "GET",
        "webhookId=hook-7&jobType=deploy&jobName=app&buildNumber=twelve",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let dump: Value = serde_json::from_str(&body)?;
    assert_eq!(dump["name"], "app");
    assert_eq!(dump["buildnumber"], "twelve");
    assert_eq!(dump["status"], "");
    assert!(
        dump["error"]
            .as_str()
            .unwrap_or_default()
            .contains("invalid digit found in string")
    );
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_parameters_read_as_empty() -> Result<()> {
    let jenkins = MockServer::start().await;
    expect_no_webhook(&jenkins).await;

    let (_, body) = call(router(&jenkins)?, "GET", "jobName=app").await?;

    let dump: Value = serde_json::from_str(&body)?;
    assert_eq!(dump["buildnumber"], "");
    assert_eq!(dump["webhookid"], "");
    assert_eq!(dump["jobtype"], "");
    assert_eq!(
        dump["error"],
        "invalid build number \"\": cannot parse integer from empty string"
    );
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_keep_their_own_job_info() -> Result<()> {
    let jenkins = MockServer::start().await;
    for build in 1..=8u32 {
        mock_build_result(&jenkins, "app", build, Value::Null).await;
        expect_webhook(&jenkins, &format!("hook-{build}"), &format!("type-{build}"), 1).await;
    }
    let app = router(&jenkins)?;

    let calls = (1..=8u32).map(|build| {
        let app = app.clone();
        tokio::spawn(async move {
            let query = format!(
                "webhookId=hook-{build}&jobType=type-{build}&jobName=app&buildNumber={build}"
            );
            call(app, "GET", &query).await.map(|(_, body)| (build, body))
        })
    });

    for handle in calls.collect::<Vec<_>>() {
        let (build, body) = handle.await??;
        assert_eq!(body, format!("type-{build}"));
    }
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repeated_parameters_use_their_first_value() -> Result<()> {
    let jenkins = MockServer::start().await;
    mock_build_result(&jenkins, "app", 3, Value::Null).await;
    expect_webhook(&jenkins, "hook-3", "a", 1).await;

    let (status, body) = call(
        router(&jenkins)?,
        "GET",
        "webhookId=hook-3&jobName=app&buildNumber=3&jobType=a&jobType=b",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "a");
    jenkins.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_job_name_is_reported_without_calling_jenkins() -> Result<()> {
    let jenkins = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&jenkins)
        .await;

    let (status, body) = call(
        router(&jenkins)?,
        "GET",
        "webhookId=hook-3&jobType=deploy&buildNumber=3",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Invalid configuration: job path \"\" names no job");
    jenkins.verify().await;
    Ok(())
}
