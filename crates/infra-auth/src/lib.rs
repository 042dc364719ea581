// Auth adapters: HMAC-signed bearer tokens and an in-process credential store

mod credential_store;
mod token_codec;

pub use credential_store::InMemoryCredentialStore;
pub use token_codec::{HmacTokenCodec, TokenAlgorithm};
