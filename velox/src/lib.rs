pub mod config;
pub mod controller;
pub mod dir;
pub mod error_surface;
pub mod fields;
pub mod navigator;
pub mod session;
pub mod status;
pub mod transport;

pub use controller::{SubmissionController, SubmissionState, SubmitError};
pub use fields::{Field, FormFields};
pub use session::{Session, SessionEvent, SessionSink, SessionStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
