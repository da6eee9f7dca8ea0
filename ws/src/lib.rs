mod client;
mod manager;
mod ws_server;

pub use manager::Manager;
pub use ws_server::{router, HEART_BEAT_INTERVAL};
