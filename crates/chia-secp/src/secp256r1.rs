mod public_key;
mod secret_key;
mod signature;

pub use public_key::*;
pub use secret_key::*;
pub use signature::*;
