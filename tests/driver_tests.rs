use std::time::Duration;

use neuralator::driver::EffectExecutor;
use neuralator::kernel::event::{Event, InputEvent, RecognitionSignal, RequestId, ServiceEvent};
use neuralator::kernel::reactor::{Reactor, ReactorConfig};
use neuralator::kernel::scheduler::SideEffect;
use neuralator::services::llm::{AssistantService, ServiceError};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Canned backend with an optional artificial delay.
#[derive(Clone, Default)]
struct FakeService {
    delay: Option<Duration>,
    fail: bool,
}

impl AssistantService for FakeService {
    async fn analyze_transcript(&self, text: String) -> Result<Value, ServiceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ServiceError::Status(500));
        }
        Ok(json!({
            "isAggressive": text.contains("fired"),
            "severity": 0.9,
            "reason": "Threat of dismissal.",
            "stressAdjustment": 40
        }))
    }

    async fn generate_notification(&self, zone: String) -> Result<String, ServiceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(format!("Employee is resting in {}.", zone))
    }
}

fn executor(service: FakeService, timeout: Duration) -> (EffectExecutor<FakeService>, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(16);
    (EffectExecutor::new(service, tx, timeout), rx)
}

#[tokio::test]
async fn test_classification_reply_is_routed_back() {
    let (mut exec, mut rx) = executor(FakeService::default(), Duration::from_secs(1));
    let request = RequestId::new();
    exec.execute(SideEffect::ClassifyTranscript {
        request,
        text: "You're fired".to_string(),
    });

    match rx.recv().await {
        Some(Event::Service(ServiceEvent::AnalysisCompleted { request: got, outcome })) => {
            assert_eq!(got, request);
            let value = outcome.expect("fake service succeeds");
            assert_eq!(value["isAggressive"], json!(true));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_notification_reply_is_routed_back() {
    let (mut exec, mut rx) = executor(FakeService::default(), Duration::from_secs(1));
    let request = RequestId::new();
    exec.execute(SideEffect::GenerateNotification {
        request,
        zone: "Reading Nook".to_string(),
    });

    match rx.recv().await {
        Some(Event::Service(ServiceEvent::NotificationGenerated { request: got, outcome })) => {
            assert_eq!(got, request);
            assert_eq!(outcome, Ok("Employee is resting in Reading Nook.".to_string()));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let slow = FakeService {
        delay: Some(Duration::from_secs(5)),
        fail: false,
    };
    let (mut exec, mut rx) = executor(slow, Duration::from_millis(20));
    exec.execute(SideEffect::ClassifyTranscript {
        request: RequestId::new(),
        text: "hello".to_string(),
    });

    match rx.recv().await {
        Some(Event::Service(ServiceEvent::AnalysisCompleted { outcome, .. })) => {
            assert_eq!(outcome, Err(ServiceError::Timeout));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_recognition_commands_are_acknowledged() {
    let (mut exec, mut rx) = executor(FakeService::default(), Duration::from_secs(1));

    exec.execute(SideEffect::StartRecognition);
    assert!(matches!(
        rx.try_recv(),
        Ok(Event::Input(InputEvent::Recognition(RecognitionSignal::Started)))
    ));

    exec.execute(SideEffect::StopRecognition);
    assert!(matches!(
        rx.try_recv(),
        Ok(Event::Input(InputEvent::Recognition(RecognitionSignal::Ended)))
    ));
}

#[tokio::test]
async fn test_shutdown_aborts_in_flight_calls() {
    let slow = FakeService {
        delay: Some(Duration::from_secs(5)),
        fail: false,
    };
    let (mut exec, mut rx) = executor(slow, Duration::from_secs(10));
    exec.execute(SideEffect::ClassifyTranscript {
        request: RequestId::new(),
        text: "hello".to_string(),
    });
    assert_eq!(exec.in_flight(), 1);

    exec.shutdown();
    assert_eq!(exec.in_flight(), 0);

    let waited = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(waited.is_err(), "aborted call must not reply");
}

#[tokio::test]
async fn test_run_loop_end_to_end() {
    let (tx, rx) = mpsc::channel(100);
    let mut reactor = Reactor::new(rx, tx, ReactorConfig { rng_seed: Some(2) });
    let mut exec = EffectExecutor::new(FakeService::default(), reactor.sender(), Duration::from_secs(1));

    let input = reactor.sender();
    input
        .send(Event::Input(InputEvent::SetTranscript("Finish it or you're fired".to_string())))
        .await
        .unwrap();
    input.send(Event::Input(InputEvent::SubmitTranscript)).await.unwrap();

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        trigger.cancel();
    });

    reactor.run(&mut exec, shutdown).await;

    assert!(reactor.tick.frame >= 2);
    assert_eq!(reactor.state.incidents().len(), 1);
    assert_eq!(reactor.state.burnout(), 55);
    assert_eq!(reactor.scheduler.armed_count(), 0, "timers released on shutdown");
    assert_eq!(exec.in_flight(), 0);
}

#[tokio::test]
async fn test_failing_service_degrades_gracefully() {
    let broken = FakeService {
        delay: None,
        fail: true,
    };
    let (tx, rx) = mpsc::channel(100);
    let mut reactor = Reactor::new(rx, tx, ReactorConfig { rng_seed: Some(2) });
    let mut exec = EffectExecutor::new(broken, reactor.sender(), Duration::from_secs(1));

    let input = reactor.sender();
    input
        .send(Event::Input(InputEvent::SetTranscript("You're fired".to_string())))
        .await
        .unwrap();
    input.send(Event::Input(InputEvent::SubmitTranscript)).await.unwrap();

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        trigger.cancel();
    });
    reactor.run(&mut exec, shutdown).await;

    assert!(reactor.state.incidents().is_empty());
    assert_eq!(reactor.state.burnout(), 15);
    assert!(!reactor.state.is_analyzing());
}
