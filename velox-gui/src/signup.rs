use std::sync::Arc;

use iced::{
    widget::{button, container, text, text_input, Column, Row},
    Alignment, Element, Length, Task,
};

use velox::{
    controller::{execute, Ticket},
    error_surface::ErrorSurface,
    navigator::{Navigator, SIGN_IN_ROUTE},
    transport::{Outcome, Transport},
    Field, FormFields, SessionSink, SubmissionController,
};

#[derive(Debug, Clone)]
pub enum Message {
    FieldEdited(Field, String),
    Submit,
    Submitted(Ticket, Outcome),
    DismissError,
    SignIn,
}

pub struct SignUp {
    controller: SubmissionController,
    navigator: Arc<dyn Navigator>,
}

impl SignUp {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionSink>,
        navigator: Arc<dyn Navigator>,
        landing_route: String,
    ) -> Self {
        Self {
            controller: SubmissionController::new(
                transport,
                session,
                navigator.clone(),
                landing_route,
            ),
            navigator,
        }
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SubmissionController {
        &mut self.controller
    }

    /// Called when the page is replaced by another one.
    pub fn close(&mut self) {
        self.controller.dispose();
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FieldEdited(field, value) => self.controller.set_field(field, value),
            Message::Submit => match self.controller.begin_submit() {
                Ok(submission) => {
                    return Task::perform(
                        execute(self.controller.transport(), submission),
                        |(ticket, outcome)| Message::Submitted(ticket, outcome),
                    );
                }
                Err(e) => tracing::debug!("{}", e),
            },
            Message::Submitted(ticket, outcome) => self.controller.resolve(ticket, outcome),
            Message::DismissError => self.controller.dismiss_error(),
            Message::SignIn => self.navigator.go(SIGN_IN_ROUTE),
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fields = self.controller.fields();
        let can_submit = self.controller.can_submit();

        let form = Column::new()
            .spacing(20)
            .max_width(500)
            .push(
                Column::new()
                    .spacing(5)
                    .push(text("Velox").size(48))
                    .push(text("Create an account to start using Velox!").size(12)),
            )
            .push_maybe(error_surface(self.controller.error_surface()))
            .push(field_input(fields, Field::Username, can_submit))
            .push(
                Row::new()
                    .spacing(10)
                    .push(field_input(fields, Field::Password, can_submit))
                    .push(field_input(fields, Field::ConfirmPassword, can_submit)),
            )
            .push(
                button(text(if self.controller.status().loading {
                    "Loading..."
                } else {
                    "Create An Account"
                }))
                .padding(10)
                .on_press_maybe(can_submit.then_some(Message::Submit)),
            )
            .push(
                container(
                    button(text("Sign in to your account").size(12))
                        .style(button::text)
                        .on_press(Message::SignIn),
                )
                .center_x(Length::Fill),
            );

        container(form)
            .padding(50)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}

fn field_input<'a>(
    fields: &'a FormFields,
    field: Field,
    can_submit: bool,
) -> Element<'a, Message> {
    let input = text_input(field.label(), fields.get(field))
        .on_input(move |value| Message::FieldEdited(field, value))
        .secure(field.is_secret())
        .padding(10);
    if can_submit {
        input.on_submit(Message::Submit).into()
    } else {
        input.into()
    }
}

fn error_surface(surface: ErrorSurface<'_>) -> Option<Element<'_, Message>> {
    surface.displayed().map(|message| {
        container(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(text(message).style(text::danger).width(Length::Fill))
                .push(
                    button(text("Dismiss").size(12))
                        .style(button::text)
                        .on_press(Message::DismissError),
                ),
        )
        .padding(10)
        .style(container::bordered_box)
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::PageNavigator;
    use crate::testing::{rejected, success, MockTransport};
    use velox::{navigator::LANDING_ROUTE, SessionStore, SubmissionState};

    fn page(transport: Arc<MockTransport>) -> (SignUp, SessionStore, PageNavigator) {
        let session = SessionStore::in_memory();
        let navigator = PageNavigator::default();
        let page = SignUp::new(
            transport,
            Arc::new(session.clone()),
            Arc::new(navigator.clone()),
            LANDING_ROUTE.to_string(),
        );
        (page, session, navigator)
    }

    #[test]
    fn edits_update_the_form() {
        let (mut page, _, _) = page(MockTransport::with(vec![]));
        let _ = page.update(Message::FieldEdited(Field::Username, "alice".to_string()));
        let _ = page.update(Message::FieldEdited(Field::Password, "pw".to_string()));
        assert_eq!(page.controller().fields().username, "alice");
        assert_eq!(page.controller().fields().password, "pw");
        assert_eq!(page.controller().fields().confirm_password, "");
    }

    #[test]
    fn submit_disables_the_form() {
        let (mut page, _, _) = page(MockTransport::with(vec![]));
        let _ = page.update(Message::Submit);
        assert_eq!(page.controller().state(), SubmissionState::Submitting);
        assert!(page.controller().status().loading);
        assert!(!page.controller().can_submit());

        // A second submit while loading is a no-op.
        let _ = page.update(Message::Submit);
        assert_eq!(page.controller().state(), SubmissionState::Submitting);
    }

    #[test]
    fn failure_then_dismiss() {
        let (mut page, session, navigator) = page(MockTransport::with(vec![]));
        let submission = page.controller_mut().begin_submit().unwrap();

        let _ = page.update(Message::Submitted(
            submission.ticket,
            rejected(Some("Username already taken")),
        ));
        assert_eq!(
            page.controller().error_surface().displayed(),
            Some("Username already taken")
        );
        assert!(page.controller().can_submit());

        let _ = page.update(Message::DismissError);
        assert_eq!(page.controller().error_surface().displayed(), None);
        assert!(!session.is_authenticated());
        assert_eq!(navigator.take(), None);
    }

    #[test]
    fn success_opens_landing_route() {
        let (mut page, session, navigator) = page(MockTransport::with(vec![]));
        let submission = page.controller_mut().begin_submit().unwrap();

        let _ = page.update(Message::Submitted(submission.ticket, success()));
        assert_eq!(navigator.take(), Some("/chat".to_string()));
        assert_eq!(session.current().map(|s| s.token), Some("tok-123".to_string()));
    }

    #[test]
    fn sign_in_link() {
        let (mut page, _, navigator) = page(MockTransport::with(vec![]));
        let _ = page.update(Message::SignIn);
        assert_eq!(navigator.take(), Some("/".to_string()));
    }
}
