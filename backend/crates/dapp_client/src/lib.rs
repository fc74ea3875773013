//! Rental DApp Client
//!
//! Client side of the wallet sign-in plus the read-only views the DApp
//! derives from the rental contract:
//! - `auth_flow` - connect wallet, fetch nonce, sign SIWE message, verify, load profile
//! - `api` - HTTP calls against the auth backend (cookie session)
//! - `wallet` - wallet abstraction and a local private-key wallet
//! - `contract` - contract status reconstruction and action guards
//! - `price` - ETH/USD spot price and amount formatting

pub mod api;
pub mod auth_flow;
pub mod config;
pub mod contract;
pub mod error;
pub mod price;
pub mod wallet;

pub use api::{AuthApi, UserProfile};
pub use auth_flow::{AuthFlow, LoginError, LoginStage, LoginStatus};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, WalletError};
pub use wallet::{KeyWallet, WalletProvider};
