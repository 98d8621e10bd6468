mod client;
mod error;
mod event;
mod network;
mod peer;
mod request_map;
mod response;
mod tls;

pub use client::*;
pub use error::*;
pub use event::*;
pub use network::*;
pub use peer::*;
pub use response::*;
pub use tls::*;
