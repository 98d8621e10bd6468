#[cfg(feature = "py-bindings")]
pub mod from_json_dict;
#[cfg(feature = "py-bindings")]
pub mod to_json_dict;

pub mod bls;
pub mod bytes;
pub mod chia_error;
pub mod coin;
pub mod coin_state;
pub mod message_struct;
pub mod respond_to_ph_updates;
pub mod streamable;
