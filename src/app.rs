use crate::api::{ApiClient, HealthResponse};
use crate::application::{AnyTrigger, CaptureCoordinator};
use crate::config::AppConfig;
use crate::domain::AppError;
use crate::ui::{CaptureMessage, CaptureView};
use bytes::Bytes;
use iced::Task;
use std::path::PathBuf;
use std::time::Duration;

pub struct CaptureApp {
    view: CaptureView,
    coordinator: CaptureCoordinator<AnyTrigger>,
    status_clear_delay: Duration,
}

impl Default for CaptureApp {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl CaptureApp {
    pub fn new(config: &AppConfig) -> Self {
        let api_client = ApiClient::new(config.api_config());
        let trigger = AnyTrigger::from_config(config);

        Self {
            view: CaptureView::default(),
            coordinator: CaptureCoordinator::new(api_client, trigger),
            status_clear_delay: config.status_clear_delay(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(CaptureMessage),
    /// Body returned by the capture endpoint
    CaptureFetched(Result<Bytes, AppError>),
    /// Final result after handing the body to the download trigger
    CaptureSaved(Result<PathBuf, AppError>),
    /// The success notice of the given submission has timed out
    StatusExpired(u64),
    HealthChecked(Result<HealthResponse, AppError>),
}

pub fn update(app: &mut CaptureApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                CaptureMessage::CapturePressed => match app.view.form.submit() {
                    Ok(submission) => {
                        app.view.form = submission.state;
                        let request = submission.request;
                        let coordinator = app.coordinator.clone();

                        // Step 1: ask the service for the file
                        return Task::perform(
                            async move { coordinator.capture(&request).await },
                            Message::CaptureFetched,
                        );
                    }
                    // The button is disabled while busy; a stray press is dropped.
                    Err(AppError::Busy) => {}
                    Err(e) => {
                        app.view.form = app.view.form.fail(e.to_string());
                    }
                },
                CaptureMessage::HealthPressed if !app.view.form.is_busy() => {
                    app.view.service_note = Some("Checking service...".to_string());
                    let coordinator = app.coordinator.clone();
                    return Task::perform(
                        async move { coordinator.check_health().await },
                        Message::HealthChecked,
                    );
                }
                _ => {}
            }
        }
        Message::CaptureFetched(result) => match result {
            Ok(bytes) => {
                app.view.form = app.view.form.saving();
                let format = app.view.form.format;
                let coordinator = app.coordinator.clone();

                // Step 2: save it
                return Task::perform(
                    async move {
                        coordinator
                            .deliver(format, bytes, chrono::Utc::now())
                            .await
                    },
                    Message::CaptureSaved,
                );
            }
            Err(e) => {
                app.view.form = app.view.form.fail(e.to_string());
            }
        },
        Message::CaptureSaved(result) => match result {
            Ok(path) => {
                app.view.form = app.view.form.succeed(path);
                let generation = app.view.form.generation;
                return Task::perform(
                    expire_after(app.status_clear_delay, generation),
                    |message| message,
                );
            }
            Err(e) => {
                app.view.form = app.view.form.fail(e.to_string());
            }
        },
        Message::StatusExpired(generation) => {
            app.view.form = app.view.form.expire(generation);
        }
        Message::HealthChecked(result) => {
            app.view.service_note = Some(match result {
                Ok(health) if health.service.is_empty() => format!("Service: {}", health.status),
                Ok(health) => format!("Service {}: {}", health.service, health.status),
                Err(e) => format!("Service unavailable: {}", e),
            });
        }
    }
    Task::none()
}

/// Resolves to the reset for `generation` once `delay` has passed.
pub async fn expire_after(delay: Duration, generation: u64) -> Message {
    tokio::time::sleep(delay).await;
    Message::StatusExpired(generation)
}

pub fn view(app: &CaptureApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

pub fn title(app: &CaptureApp) -> String {
    if app.view.form.is_busy() {
        "Web Page Capture (capturing...)".to_string()
    } else {
        "Web Page Capture".to_string()
    }
}
