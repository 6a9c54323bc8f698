use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use velox::{
    transport::{Account, ErrorBody, Outcome, SignUpResponse, Transport},
    FormFields,
};

#[derive(Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
}

impl MockTransport {
    pub fn with(outcomes: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
        })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn sign_up(&self, _request: FormFields) -> Outcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Outcome::Fault("no outcome scripted".to_string()))
    }
}

pub fn success() -> Outcome {
    Outcome::Success(SignUpResponse {
        data: Account {
            id: "1".to_string(),
            username: "alice".to_string(),
            token: "tok-123".to_string(),
        },
    })
}

pub fn rejected(message: Option<&str>) -> Outcome {
    Outcome::Rejected(ErrorBody {
        http_status: Some(400),
        message: message.map(str::to_string),
    })
}
