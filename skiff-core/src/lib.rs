pub mod address;
pub mod bookmarks;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod history_view;
pub mod paths;
pub mod session;

pub use error::StoreError;
