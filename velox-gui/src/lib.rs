pub mod gui;
pub mod logger;
pub mod navigator;
pub mod signup;

#[cfg(test)]
mod testing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
