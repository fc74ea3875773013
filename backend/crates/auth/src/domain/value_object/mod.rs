//! Value Object Module

pub mod nonce;
pub mod wallet_address;
