use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lookup_core::{ControlMessage, Phase};
use lookup_engine::{
    CycleFailure, CycleOutcome, InProcessTab, LookupSettings, Orchestrator, RendererTiming,
    SurfaceSnapshot, Tab, Trigger,
};

const PAGE: &str =
    "<html><head><title>Title</title></head><body><article><h1>Title</h1><p>Body text</p></article></body></html>";
const PAGE_URL: &str = "https://example.com/post";

fn settings_for(server: &MockServer) -> LookupSettings {
    LookupSettings {
        endpoint_url: server.uri(),
        model: "llama3".to_string(),
    }
}

fn trigger() -> Trigger {
    Trigger {
        selected_text: "bar".to_string(),
        tab_id: 1,
    }
}

async fn mock_chat_stream(server: &MockServer) {
    let body = concat!(
        "{\"message\":{\"content\":\"Foo is \"},\"done\":false}\n",
        "{\"message\":{\"content\":\"a bar.\"},\"done\":false}\n",
        "{\"done\":true}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/x-ndjson"),
        )
        .mount(server)
        .await;
}

/// Polls the tab surface until `predicate` holds or two seconds elapse.
/// Control messages travel through the renderer's channel, so the surface
/// settles shortly after the cycle returns rather than synchronously.
async fn wait_for_surface<F>(tab: &InProcessTab, predicate: F) -> Option<SurfaceSnapshot>
where
    F: Fn(&Option<SurfaceSnapshot>) -> bool,
{
    for _ in 0..200 {
        let snapshot = tab.surface();
        if predicate(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("surface never reached the expected shape: {:?}", tab.surface());
}

#[tokio::test]
async fn full_cycle_renders_the_streamed_explanation() {
    let server = MockServer::start().await;
    mock_chat_stream(&server).await;

    let tab = InProcessTab::new(PAGE, PAGE_URL);
    let orchestrator = Orchestrator::from_settings(settings_for(&server));

    let outcome = orchestrator.run_cycle(trigger(), &tab).await;
    assert_eq!(outcome, CycleOutcome::Completed { chunks: 2 });
    assert!(orchestrator.trigger_enabled());

    let snapshot = wait_for_surface(&tab, |s| {
        s.as_ref()
            .is_some_and(|s| s.phase == Phase::Streaming && s.content == "Foo is a bar.")
    })
    .await
    .expect("streaming surface");
    assert_eq!(snapshot.content, "Foo is a bar.");

    // The renderer host stays injected and answers pings afterwards.
    assert!(tab.ping().await.expect("ping"));
}

#[tokio::test]
async fn backend_down_shows_a_single_error_surface() {
    let tab = InProcessTab::new(PAGE, PAGE_URL);
    let settings = LookupSettings {
        endpoint_url: "http://127.0.0.1:9".to_string(),
        model: "llama3".to_string(),
    };
    let orchestrator = Orchestrator::from_settings(settings);

    let outcome = orchestrator.run_cycle(trigger(), &tab).await;
    match outcome {
        CycleOutcome::Failed {
            failure: CycleFailure::BackendUnreachable(_),
        } => {}
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(orchestrator.trigger_enabled());

    let snapshot = wait_for_surface(&tab, |s| {
        s.as_ref().is_some_and(|s| s.phase == Phase::Error)
    })
    .await
    .expect("error surface");
    assert!(
        snapshot.content.contains("Please ensure the generation server"),
        "{:?}",
        snapshot.content
    );
}

#[tokio::test]
async fn streamed_markdown_is_rendered_as_inline_markup() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"message\":{\"content\":\"**Bar**: a\\n\\nmetal. See [docs](https://example.com)\"},\"done\":false}\n",
        "{\"done\":true}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/x-ndjson"),
        )
        .mount(&server)
        .await;

    let tab = InProcessTab::new(PAGE, PAGE_URL);
    let orchestrator = Orchestrator::from_settings(settings_for(&server));

    let outcome = orchestrator.run_cycle(trigger(), &tab).await;
    assert_eq!(outcome, CycleOutcome::Completed { chunks: 1 });

    let snapshot = wait_for_surface(&tab, |s| {
        s.as_ref().is_some_and(|s| s.phase == Phase::Streaming)
    })
    .await
    .expect("streaming surface");
    assert_eq!(
        snapshot.content,
        "<strong>Bar</strong>: a<br><br>metal. See <a href='https://example.com'>docs</a>"
    );
}

#[tokio::test]
async fn surface_auto_dismisses_after_the_reading_interval() {
    let server = MockServer::start().await;
    mock_chat_stream(&server).await;

    let timing = RendererTiming {
        reading: Duration::from_millis(250),
        error: Duration::from_millis(100),
    };
    let tab = InProcessTab::with_timing(PAGE, PAGE_URL, timing);
    let orchestrator = Orchestrator::from_settings(settings_for(&server));

    let outcome = orchestrator.run_cycle(trigger(), &tab).await;
    assert_eq!(outcome, CycleOutcome::Completed { chunks: 2 });

    wait_for_surface(&tab, |s| {
        s.as_ref().is_some_and(|s| s.content == "Foo is a bar.")
    })
    .await;
    // The reading timer from the last mounted surface removes it.
    wait_for_surface(&tab, Option::is_none).await;
}

#[tokio::test]
async fn close_click_removes_the_surface_and_stays_idempotent() {
    let tab = InProcessTab::new(PAGE, PAGE_URL);
    tab.inject_renderer().await.expect("injection");
    tab.send(ControlMessage::ShowProcessing {
        message: "working".to_string(),
    })
    .await
    .expect("send");

    wait_for_surface(&tab, |s| {
        s.as_ref().is_some_and(|s| s.phase == Phase::Processing)
    })
    .await;

    tab.click_close().expect("first close");
    wait_for_surface(&tab, Option::is_none).await;

    // A second click on the now-absent surface is a no-op, not an error.
    tab.click_close().expect("second close");
    assert!(tab.surface().is_none());
}
