/// Route of the authenticated landing page.
pub const LANDING_ROUTE: &str = "/chat";
/// Route of the sign-in page.
pub const SIGN_IN_ROUTE: &str = "/";
pub const SIGN_UP_ROUTE: &str = "/sign-up";

/// Client-side route changes.
pub trait Navigator: Send + Sync {
    fn go(&self, path: &str);
}
