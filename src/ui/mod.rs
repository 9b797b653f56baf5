use iced::{
    widget::{button, column, pick_list, row, text, text_input, Space},
    Element, Length,
};

use crate::domain::{FormState, OutputFormat, Stage, Status};

/// Main view state
#[derive(Default)]
pub struct CaptureView {
    pub form: FormState,
    /// Last service health result, shown under the form.
    pub service_note: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CaptureMessage {
    UrlChanged(String),
    FormatSelected(OutputFormat),
    CapturePressed,
    HealthPressed,
}

/// One-line description of the current status.
pub fn status_line(form: &FormState) -> String {
    match &form.status {
        Status::Idle => "Enter a URL and pick a format".to_string(),
        Status::InProgress(Stage::Capturing) => "Capturing web page...".to_string(),
        Status::InProgress(Stage::Saving) => "Saving file...".to_string(),
        Status::Succeeded(path) => format!("Capture complete! Saved to {}", path.display()),
        Status::Failed(message) => message.clone(),
    }
}

impl CaptureView {
    pub fn update(&mut self, message: CaptureMessage) {
        match message {
            CaptureMessage::UrlChanged(url) => {
                self.form = self.form.with_url(url);
            }
            CaptureMessage::FormatSelected(format) => {
                self.form = self.form.with_format(format);
            }
            CaptureMessage::CapturePressed | CaptureMessage::HealthPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, CaptureMessage> {
        let busy = self.form.is_busy();

        let url_input = text_input("https://example.com", &self.form.url).padding(10);
        let url_input = if busy {
            url_input
        } else {
            url_input
                .on_input(CaptureMessage::UrlChanged)
                .on_submit(CaptureMessage::CapturePressed)
        };

        let status = text(status_line(&self.form)).size(14);
        let status = match self.form.status {
            Status::Failed(_) => status.style(text::danger),
            Status::Succeeded(_) => status.style(text::success),
            _ => status,
        };

        let capture_label = if busy { "Capturing..." } else { "Capture page" };

        column![
            text("Web Page Capture").size(32),
            text("Save a full web page as a PNG image or PDF document").size(16),
            Space::new().height(Length::Fixed(20.0)),
            text("Web page URL:").size(16),
            url_input,
            text("File format:").size(16),
            pick_list(
                &OutputFormat::ALL[..],
                Some(self.form.format),
                CaptureMessage::FormatSelected
            )
            .padding(10),
            Space::new().height(Length::Fixed(10.0)),
            status,
            Space::new().height(Length::Fixed(20.0)),
            row![
                button(capture_label)
                    .on_press_maybe(
                        self.form
                            .can_submit()
                            .then_some(CaptureMessage::CapturePressed)
                    )
                    .padding([10, 20]),
                button("Check service")
                    .on_press_maybe((!busy).then_some(CaptureMessage::HealthPressed))
                    .padding([10, 20]),
            ]
            .spacing(10),
            text(self.service_note.as_deref().unwrap_or_default()).size(12),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn status_line_per_status() {
        let form = FormState::default();
        assert_eq!(status_line(&form), "Enter a URL and pick a format");

        let busy = form.with_url("example.com").submit().unwrap().state;
        assert_eq!(status_line(&busy), "Capturing web page...");
        assert_eq!(status_line(&busy.saving()), "Saving file...");

        let done = busy.succeed(PathBuf::from("shot.png"));
        assert_eq!(status_line(&done), "Capture complete! Saved to shot.png");

        assert_eq!(status_line(&busy.fail("page timed out")), "page timed out");
    }

    #[test]
    fn update_applies_form_edits() {
        let mut view = CaptureView::default();
        view.update(CaptureMessage::UrlChanged("example.com".to_string()));
        view.update(CaptureMessage::FormatSelected(OutputFormat::Pdf));

        assert_eq!(view.form.url, "example.com");
        assert_eq!(view.form.format, OutputFormat::Pdf);
        assert!(view.form.can_submit());
    }
}
