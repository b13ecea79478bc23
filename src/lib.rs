pub mod app;
pub mod atoms;
pub mod color;
pub mod config;
pub mod dock;
pub mod effect;
pub mod event;
pub mod event_loop;
pub mod geometrics;
pub mod layout;
pub mod widget;
pub mod window;

pub use app::App;
pub use config::Config;
