use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::kernel::event::{Event, InputEvent, RecognitionSignal, RequestId, ServiceEvent};
use crate::kernel::scheduler::SideEffect;
use crate::services::llm::{AssistantService, ServiceError};

/// Executes kernel side effects. Service calls run on their own tasks and
/// report back through the kernel channel; the kernel never awaits them.
pub struct EffectExecutor<S: AssistantService> {
    service: S,
    tx: mpsc::Sender<Event>,
    call_timeout: Duration,
    in_flight: HashMap<RequestId, JoinHandle<()>>,
}

impl<S: AssistantService> EffectExecutor<S> {
    pub fn new(service: S, tx: mpsc::Sender<Event>, call_timeout: Duration) -> Self {
        Self {
            service,
            tx,
            call_timeout,
            in_flight: HashMap::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.values().filter(|t| !t.is_finished()).count()
    }

    pub fn execute(&mut self, effect: SideEffect) {
        self.in_flight.retain(|_, task| !task.is_finished());

        match effect {
            SideEffect::Log(msg) => info!("[LOG] {}", msg),

            SideEffect::ClassifyTranscript { request, text } => {
                debug!("Dispatching analysis {}", request);
                let service = self.service.clone();
                let tx = self.tx.clone();
                let limit = self.call_timeout;

                let task = tokio::spawn(async move {
                    let outcome = match tokio::time::timeout(limit, service.analyze_transcript(text)).await {
                        Ok(result) => result,
                        Err(_) => Err(ServiceError::Timeout),
                    };
                    let reply = ServiceEvent::AnalysisCompleted { request, outcome };
                    if tx.send(Event::Service(reply)).await.is_err() {
                        debug!("Kernel gone before analysis {} returned", request);
                    }
                });
                self.in_flight.insert(request, task);
            }

            SideEffect::GenerateNotification { request, zone } => {
                debug!("Dispatching notification {}", request);
                let service = self.service.clone();
                let tx = self.tx.clone();
                let limit = self.call_timeout;

                let task = tokio::spawn(async move {
                    let outcome = match tokio::time::timeout(limit, service.generate_notification(zone)).await {
                        Ok(result) => result,
                        Err(_) => Err(ServiceError::Timeout),
                    };
                    let reply = ServiceEvent::NotificationGenerated { request, outcome };
                    if tx.send(Event::Service(reply)).await.is_err() {
                        debug!("Kernel gone before notification {} returned", request);
                    }
                });
                self.in_flight.insert(request, task);
            }

            // The console build has no microphone; the capability acknowledges
            // immediately and fragments arrive as operator input.
            SideEffect::StartRecognition => {
                info!("Speech recognition requested");
                self.signal(RecognitionSignal::Started);
            }
            SideEffect::StopRecognition => {
                info!("Speech recognition released");
                self.signal(RecognitionSignal::Ended);
            }
        }
    }

    fn signal(&self, signal: RecognitionSignal) {
        if let Err(e) = self.tx.try_send(Event::Input(InputEvent::Recognition(signal))) {
            warn!("Could not report recognition state: {}", e);
        }
    }

    /// Aborts every outstanding service call.
    pub fn shutdown(&mut self) {
        let count = self.in_flight.len();
        for (_, task) in self.in_flight.drain() {
            task.abort();
        }
        if count > 0 {
            info!("Aborted {} in-flight service calls", count);
        }
    }
}
