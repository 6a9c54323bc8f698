use std::sync::{Arc, Mutex, PoisonError};

use velox::navigator::Navigator;

/// Records the route requested by a page; the application switches page once the page
/// update returns.
#[derive(Debug, Clone, Default)]
pub struct PageNavigator {
    requested: Arc<Mutex<Option<String>>>,
}

impl PageNavigator {
    pub fn take(&self) -> Option<String> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for PageNavigator {
    fn go(&self, path: &str) {
        tracing::debug!("Navigating to {}", path);
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner) = Some(path.to_string());
    }
}
