use std::sync::Arc;

use iced::{
    widget::{button, container, text, Column},
    Alignment, Element, Length, Task,
};

use velox::{
    config::Config,
    dir::VeloxDirectory,
    navigator::{Navigator, SIGN_IN_ROUTE, SIGN_UP_ROUTE},
    transport::{HttpTransport, Transport},
    Session, SessionEvent, SessionSink, SessionStore,
};

use crate::{
    navigator::PageNavigator,
    signup::{self, SignUp},
    VERSION,
};

/// Services shared by the pages.
#[derive(Clone)]
pub struct Context {
    pub transport: Arc<dyn Transport>,
    pub session: SessionStore,
    pub landing_route: String,
}

impl Context {
    pub fn new(
        config: &Config,
        datadir: &VeloxDirectory,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let transport = HttpTransport::new(config.api_url.clone(), config.request_timeout())?;
        tracing::info!("Using authentication service at {}", config.api_url);
        Ok(Self {
            transport: Arc::new(transport),
            session: SessionStore::init(datadir),
            landing_route: config.landing_route.clone(),
        })
    }
}

pub enum Page {
    SignIn,
    SignUp(SignUp),
    Chat(Session),
}

#[derive(Debug, Clone)]
pub enum Message {
    SignUp(signup::Message),
    CreateAccount,
    Logout,
}

pub struct GUI {
    context: Context,
    navigator: PageNavigator,
    page: Page,
}

impl GUI {
    pub fn title(&self) -> String {
        format!("Velox v{}", VERSION)
    }

    pub fn new(context: Context) -> (GUI, Task<Message>) {
        let navigator = PageNavigator::default();
        let page = match context.session.current() {
            Some(session) => Page::Chat(session),
            None => Page::SignUp(sign_up_page(&context, &navigator)),
        };
        (
            Self {
                context,
                navigator,
                page,
            },
            Task::none(),
        )
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::SignUp(msg) => match &mut self.page {
                Page::SignUp(page) => page.update(msg).map(Message::SignUp),
                _ => {
                    tracing::debug!("Sign-up page is closed, message dropped: {:?}", msg);
                    Task::none()
                }
            },
            Message::CreateAccount => {
                self.navigator.go(SIGN_UP_ROUTE);
                Task::none()
            }
            Message::Logout => {
                self.context.session.apply(SessionEvent::Logout);
                self.navigator.go(SIGN_IN_ROUTE);
                Task::none()
            }
        };

        if let Some(route) = self.navigator.take() {
            self.navigate(&route);
        }

        task
    }

    fn navigate(&mut self, route: &str) {
        if let Page::SignUp(page) = &mut self.page {
            page.close();
        }
        self.page = if route == self.context.landing_route {
            match self.context.session.current() {
                Some(session) => Page::Chat(session),
                None => {
                    tracing::warn!("No session, {} is not reachable", route);
                    Page::SignIn
                }
            }
        } else if route == SIGN_UP_ROUTE {
            Page::SignUp(sign_up_page(&self.context, &self.navigator))
        } else {
            if route != SIGN_IN_ROUTE {
                tracing::warn!("Unknown route {}", route);
            }
            Page::SignIn
        };
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<Message> = match &self.page {
            Page::SignUp(page) => return page.view().map(Message::SignUp),
            Page::SignIn => Column::new()
                .spacing(20)
                .align_x(Alignment::Center)
                .push(text("Velox").size(48))
                .push(text("Sign in to your account"))
                .push(
                    button(text("Create An Account").size(12))
                        .style(button::text)
                        .on_press(Message::CreateAccount),
                )
                .into(),
            Page::Chat(session) => Column::new()
                .spacing(20)
                .align_x(Alignment::Center)
                .push(text(format!("Signed in as {}", session.username)))
                .push(button(text("Log out")).on_press(Message::Logout))
                .into(),
        };

        container(content)
            .padding(50)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}

fn sign_up_page(context: &Context, navigator: &PageNavigator) -> SignUp {
    SignUp::new(
        context.transport.clone(),
        Arc::new(context.session.clone()),
        Arc::new(navigator.clone()),
        context.landing_route.clone(),
    )
}
