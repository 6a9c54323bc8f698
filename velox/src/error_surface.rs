use crate::status::SubmissionStatus;

/// Read-only view of the submission failure. Dismissal goes through
/// [`crate::controller::SubmissionController::dismiss_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSurface<'a> {
    visible: bool,
    text: &'a str,
}

impl<'a> ErrorSurface<'a> {
    pub fn new(status: &'a SubmissionStatus) -> Self {
        Self {
            visible: status.error,
            text: &status.message,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Text to display, `None` when hidden.
    pub fn displayed(&self) -> Option<&'a str> {
        self.visible.then_some(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_status() {
        let mut status = SubmissionStatus::default();
        assert_eq!(ErrorSurface::new(&status).displayed(), None);

        status.error = true;
        status.message = "Username already taken".to_string();
        let surface = ErrorSurface::new(&status);
        assert!(surface.visible());
        assert_eq!(surface.displayed(), Some("Username already taken"));
    }
}
