use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    error_surface::ErrorSurface,
    fields::{Field, FormFields},
    navigator::Navigator,
    session::{SessionEvent, SessionSink},
    status::{StatusUpdate, SubmissionStatus},
    transport::{Outcome, Transport},
};

/// Message shown when the server refused the request without saying why.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";
/// Message shown when no answer could be obtained from the server.
pub const TRANSPORT_FAULT_MESSAGE: &str = "Unable to reach the server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Failed,
}

/// Identifies one submission, resolutions carrying another ticket are stale.
/// Tickets are unique in the process, so two forms never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

static NEXT_TICKET: AtomicU64 = AtomicU64::new(0);

impl Ticket {
    fn next() -> Self {
        Ticket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// A submission accepted by the controller, to be sent by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: Ticket,
    pub request: FormFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    AlreadySubmitting,
    #[error("The sign-up form is closed")]
    Disposed,
}

/// Drives the sign-up form: holds the fields and the submission status, sends the
/// account creation request and hands the new session over on success.
pub struct SubmissionController {
    fields: FormFields,
    status: SubmissionStatus,
    in_flight: Option<Ticket>,
    disposed: bool,

    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionSink>,
    navigator: Arc<dyn Navigator>,
    landing_route: String,
}

impl SubmissionController {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionSink>,
        navigator: Arc<dyn Navigator>,
        landing_route: String,
    ) -> Self {
        Self {
            fields: FormFields::default(),
            status: SubmissionStatus::default(),
            in_flight: None,
            disposed: false,
            transport,
            session,
            navigator,
            landing_route,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn state(&self) -> SubmissionState {
        if self.in_flight.is_some() {
            SubmissionState::Submitting
        } else if self.status.error {
            SubmissionState::Failed
        } else {
            SubmissionState::Idle
        }
    }

    pub fn error_surface(&self) -> ErrorSurface<'_> {
        ErrorSurface::new(&self.status)
    }

    /// The submit control must be disabled when this is false.
    pub fn can_submit(&self) -> bool {
        !self.status.loading && self.in_flight.is_none() && !self.disposed
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        self.fields.set_field(field, value);
    }

    /// Enters the submitting state and returns the request to send.
    ///
    /// A previous error stays displayed until the submission resolves or the user
    /// dismisses it. Nothing is validated here, the server owns the validation of the
    /// credentials (including the password confirmation).
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitError> {
        if self.disposed {
            return Err(SubmitError::Disposed);
        }
        if self.in_flight.is_some() {
            tracing::debug!("Submit ignored, a submission is already in progress");
            return Err(SubmitError::AlreadySubmitting);
        }

        let ticket = Ticket::next();
        self.in_flight = Some(ticket);
        self.status.set_status(StatusUpdate::loading(true));

        Ok(Submission {
            ticket,
            request: self.fields.clone(),
        })
    }

    /// Applies the resolution of the submission identified by `ticket`.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Outcome) {
        if self.disposed {
            tracing::debug!("Sign-up form closed, resolution of {:?} dropped", ticket);
            return;
        }
        if self.in_flight != Some(ticket) {
            tracing::debug!("Stale resolution of {:?} dropped", ticket);
            return;
        }
        self.in_flight = None;

        match outcome {
            Outcome::Success(res) => {
                self.status.set_status(StatusUpdate::loading(false));
                tracing::info!("Account {} created", res.data.username);
                self.session.apply(SessionEvent::Login(res.data.into()));
                self.navigator.go(&self.landing_route);
            }
            Outcome::Rejected(body) => {
                tracing::warn!(
                    "Account creation refused (status: {:?}): {:?}",
                    body.http_status,
                    body.message
                );
                let message = body.message().unwrap_or(FALLBACK_ERROR_MESSAGE).to_string();
                self.status.set_status(StatusUpdate::failed(message));
            }
            Outcome::Fault(reason) => {
                tracing::warn!("Account creation request failed: {}", reason);
                self.status
                    .set_status(StatusUpdate::failed(TRANSPORT_FAULT_MESSAGE.to_string()));
            }
        }
    }

    /// Sends the form and waits for the answer.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        let submission = self.begin_submit()?;
        let outcome = self.transport.sign_up(submission.request).await;
        self.resolve(submission.ticket, outcome);
        Ok(())
    }

    /// Dismisses the displayed error. The loading flag is left as is.
    pub fn dismiss_error(&mut self) {
        self.status.set_status(StatusUpdate::cleared_error());
    }

    /// Marks the form as unmounted, later resolutions are ignored.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.in_flight = None;
    }
}

/// Sends a submission, returning the outcome with the ticket it must be resolved with.
pub async fn execute(transport: Arc<dyn Transport>, submission: Submission) -> (Ticket, Outcome) {
    let outcome = transport.sign_up(submission.request).await;
    (submission.ticket, outcome)
}
