pub mod chia_error;
pub mod streamable;

#[cfg(feature = "py-bindings")]
pub mod from_json_dict;
#[cfg(feature = "py-bindings")]
pub use crate::from_json_dict::*;
#[cfg(feature = "py-bindings")]
pub mod to_json_dict;
#[cfg(feature = "py-bindings")]
pub use crate::to_json_dict::*;

pub use crate::streamable::*;
