pub mod claims;
pub mod codec;
pub mod errors;
pub mod keys;

pub use claims::Claims;
pub use claims::TokenPurpose;
pub use codec::TokenCodec;
pub use errors::JwtError;
pub use keys::KeyRing;
pub use keys::SigningKey;
