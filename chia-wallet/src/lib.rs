mod coin_selection;
mod coin_store;
mod key_store;
mod wallet;
mod wallet_event;

pub use coin_selection::*;
pub use coin_store::*;
pub use key_store::*;
pub use wallet::*;
pub use wallet_event::*;
