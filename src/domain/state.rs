//! Form state for one capture interaction.
//!
//! `FormState` is a plain value. Every transition borrows the current state and
//! returns the next one, so the UI layer only ever swaps whole states.

use std::path::PathBuf;

use super::{AppError, CaptureRequest, OutputFormat, Stage, Status};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub url: String,
    pub format: OutputFormat,
    pub status: Status,
    /// Bumped on every accepted submission; ties a delayed status reset to
    /// the submission that scheduled it.
    pub generation: u64,
}

/// An accepted submission: the in-progress state plus the request to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub state: FormState,
    pub request: CaptureRequest,
}

impl FormState {
    pub fn is_busy(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.url.trim().is_empty()
    }

    /// Editing the URL dismisses a previous error. Ignored while busy.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        if self.is_busy() {
            return self.clone();
        }

        let status = match &self.status {
            Status::Failed(_) => Status::Idle,
            other => other.clone(),
        };

        Self {
            url: url.into(),
            status,
            ..self.clone()
        }
    }

    pub fn with_format(&self, format: OutputFormat) -> Self {
        if self.is_busy() {
            return self.clone();
        }

        Self {
            format,
            ..self.clone()
        }
    }

    pub fn submit(&self) -> Result<Submission, AppError> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }

        let request = CaptureRequest::new(&self.url, self.format)?;
        let state = Self {
            status: Status::InProgress(Stage::Capturing),
            generation: self.generation + 1,
            ..self.clone()
        };

        Ok(Submission { state, request })
    }

    /// The capture endpoint answered; the file is being written.
    pub fn saving(&self) -> Self {
        match self.status {
            Status::InProgress(Stage::Capturing) => Self {
                status: Status::InProgress(Stage::Saving),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    pub fn succeed(&self, path: PathBuf) -> Self {
        Self {
            status: Status::Succeeded(path),
            ..self.clone()
        }
    }

    pub fn fail(&self, message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed(message.into()),
            ..self.clone()
        }
    }

    /// Clears a success notice, unless a newer submission has started since.
    pub fn expire(&self, generation: u64) -> Self {
        match self.status {
            Status::Succeeded(_) if generation == self.generation => Self {
                status: Status::Idle,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> FormState {
        FormState::default().with_url(url)
    }

    #[test]
    fn defaults_to_idle_png() {
        let state = FormState::default();
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.format, OutputFormat::Png);
        assert!(!state.can_submit());
    }

    #[test]
    fn blank_url_is_rejected_without_request() {
        let state = with_url("   ");
        assert!(!state.can_submit());
        assert_eq!(state.submit(), Err(AppError::Validation));
    }

    #[test]
    fn submit_moves_to_capturing() {
        let state = with_url(" example.com ").with_format(OutputFormat::Pdf);
        let submission = state.submit().unwrap();

        assert_eq!(
            submission.state.status,
            Status::InProgress(Stage::Capturing)
        );
        assert_eq!(submission.state.generation, 1);
        assert_eq!(submission.request.url, "example.com");
        assert_eq!(submission.request.format, OutputFormat::Pdf);
    }

    #[test]
    fn second_submit_while_busy_is_refused() {
        let busy = with_url("example.com").submit().unwrap().state;
        assert!(!busy.can_submit());
        assert_eq!(busy.submit(), Err(AppError::Busy));
    }

    #[test]
    fn inputs_are_frozen_while_busy() {
        let busy = with_url("example.com").submit().unwrap().state;
        let after = busy.with_url("other.org").with_format(OutputFormat::Pdf);
        assert_eq!(after, busy);
    }

    #[test]
    fn full_success_path() {
        let busy = with_url("example.com").submit().unwrap().state;
        let saving = busy.saving();
        assert_eq!(saving.status, Status::InProgress(Stage::Saving));

        let done = saving.succeed(PathBuf::from("/tmp/out.png"));
        assert_eq!(done.status, Status::Succeeded(PathBuf::from("/tmp/out.png")));
        assert!(done.can_submit());

        let cleared = done.expire(done.generation);
        assert_eq!(cleared.status, Status::Idle);
    }

    #[test]
    fn stale_expiry_keeps_newer_status() {
        let first = with_url("example.com")
            .submit()
            .unwrap()
            .state
            .succeed(PathBuf::from("a.png"));
        let stale = first.generation;

        let second = first
            .submit()
            .unwrap()
            .state
            .succeed(PathBuf::from("b.png"));
        assert_eq!(second.expire(stale), second);

        let running = first.submit().unwrap().state;
        assert_eq!(running.expire(running.generation), running);
    }

    #[test]
    fn failure_allows_resubmit_and_clears_on_edit() {
        let failed = with_url("example.com")
            .submit()
            .unwrap()
            .state
            .fail("boom");
        assert_eq!(failed.status, Status::Failed("boom".to_string()));
        assert!(failed.submit().is_ok());

        let edited = failed.with_url("example.org");
        assert_eq!(edited.status, Status::Idle);
        assert_eq!(edited.url, "example.org");
    }
}
