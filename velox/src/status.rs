/// Status of the sign-up submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionStatus {
    pub error: bool,
    pub loading: bool,
    pub message: String,
}

/// Partial status; keys left to `None` keep their current value when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub error: Option<bool>,
    pub loading: Option<bool>,
    pub message: Option<String>,
}

impl StatusUpdate {
    pub fn loading(loading: bool) -> Self {
        Self {
            loading: Some(loading),
            ..Default::default()
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            error: Some(true),
            loading: Some(false),
            message: Some(message),
        }
    }

    pub fn cleared_error() -> Self {
        Self {
            error: Some(false),
            message: Some(String::new()),
            ..Default::default()
        }
    }
}

impl SubmissionStatus {
    /// Shallow merge of `update` into the current status.
    pub fn set_status(&mut self, update: StatusUpdate) {
        if let Some(error) = update.error {
            self.error = error;
        }
        if let Some(loading) = update.loading {
            self.loading = loading;
        }
        if let Some(message) = update.message {
            self.message = message;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unspecified_keys() {
        let mut status = SubmissionStatus {
            error: true,
            loading: false,
            message: "Username already taken".to_string(),
        };

        status.set_status(StatusUpdate::loading(true));
        assert!(status.loading);
        assert!(status.error);
        assert_eq!(status.message, "Username already taken");

        status.set_status(StatusUpdate::cleared_error());
        assert!(status.loading);
        assert!(!status.error);
        assert!(status.message.is_empty());

        status.set_status(StatusUpdate::default());
        assert_eq!(
            status,
            SubmissionStatus {
                error: false,
                loading: true,
                message: String::new(),
            }
        );
    }

    #[test]
    fn failure_clears_loading() {
        let mut status = SubmissionStatus::default();
        status.set_status(StatusUpdate::loading(true));
        status.set_status(StatusUpdate::failed("boom".to_string()));
        assert!(!status.loading);
        assert!(status.error);
        assert_eq!(status.message, "boom");
    }
}
