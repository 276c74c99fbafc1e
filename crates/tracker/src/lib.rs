//! Core of the map log: drawing sessions, entry storage and the hover and
//! selection animations, wired together by `AppController`.

pub mod animation;
pub mod app;
pub mod config;
pub mod drawing;
pub mod event;
pub mod geolocation;
pub mod map;
pub mod storage;
pub mod store;

pub use app::{AppController, AppError, AppEvent, EntryForm};
pub use config::TrackerConfig;
