//! Optional password protection for hidden messages.
//!
//! The carriers never look inside their payload; an encrypted message is just
//! a base64 token hidden like any other text.

pub mod symmetric;

pub use symmetric::{decrypt_message, encrypt_message, CryptoError};
