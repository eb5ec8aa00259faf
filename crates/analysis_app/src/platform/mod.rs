mod app;
mod effects;
mod logging;
mod selection;
mod ui;

pub use app::run_app;
