//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG, base64url, constant-time compare)
//! - Cookie building and extraction
//! - Sign-In with Ethereum (EIP-4361) message codec and signer recovery
//!
//! Nothing here knows about accounts or sessions; the `auth` crate and the
//! `dapp_client` crate both build on it.

pub mod cookie;
pub mod crypto;
pub mod siwe;
