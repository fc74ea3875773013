//! Rental Contract Views
//!
//! Read-only reconstruction of the on-chain agreement from its
//! `getContractInfo()` tuple, plus the checks the DApp runs before offering
//! an action. The contract itself enforces the rules; these only explain
//! why a button is disabled.

use std::fmt;

use alloy_primitives::{Address, U256};

/// `getContractInfo()` return values, in order
pub type ContractInfo = (Address, Address, U256, u64, u64, bool, bool, bool, bool, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Created,
    Signed,
    Locked,
    Cancelled,
    Terminated,
    Unknown(u8),
}

impl From<u8> for ContractStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => ContractStatus::Created,
            1 => ContractStatus::Signed,
            2 => ContractStatus::Locked,
            3 => ContractStatus::Cancelled,
            4 => ContractStatus::Terminated,
            other => ContractStatus::Unknown(other),
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContractStatus::Created => "Created",
            ContractStatus::Signed => "Signed",
            ContractStatus::Locked => "Locked",
            ContractStatus::Cancelled => "Cancelled",
            ContractStatus::Terminated => "Terminated",
            ContractStatus::Unknown(_) => "Unknown",
        })
    }
}

/// Why an action is not available right now
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Both parties must sign before locking.")]
    NotSignedForLock,
    #[error("Contract is already locked.")]
    AlreadyLocked,
    #[error("Contract must be locked before paying.")]
    NotLockedForPayment,
    #[error("Only the tenant can pay the rent.")]
    NotTenantForPayment,
    #[error("Missing rent amount.")]
    MissingAmount,
    #[error("This contract is already locked and cannot be canceled.")]
    LockedCannotCancel,
    #[error("This contract is already inactive.")]
    Inactive,
    #[error("Only the tenant can terminate early with a fee")]
    NotTenantForTermination,
    #[error("Contract must be locked before termination")]
    NotLockedForTermination,
    #[error("Both parties must sign before termination")]
    NotSignedForTermination,
    #[error("Invalid rent amount (cannot compute X 2 fee)")]
    ZeroRent,
    #[error("Only the landlord can update the rent.")]
    NotLandlord,
    #[error("Rent amount must be greater than 0.")]
    NonPositiveRent,
    #[error("ETH price not loaded.")]
    PriceUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSnapshot {
    pub landlord: Address,
    pub tenant: Address,
    pub rent_wei: U256,
    /// Unix seconds
    pub start: u64,
    pub end: u64,
    pub landlord_signed: bool,
    pub tenant_signed: bool,
    pub locked: bool,
    pub active: bool,
    pub status: ContractStatus,
}

impl From<ContractInfo> for ContractSnapshot {
    fn from(info: ContractInfo) -> Self {
        let (landlord, tenant, rent_wei, start, end, ll_signed, tn_signed, locked, active, status) =
            info;
        Self {
            landlord,
            tenant,
            rent_wei,
            start,
            end,
            landlord_signed: ll_signed,
            tenant_signed: tn_signed,
            locked,
            active,
            status: ContractStatus::from(status),
        }
    }
}

impl ContractSnapshot {
    pub fn both_signed(&self) -> bool {
        self.landlord_signed && self.tenant_signed
    }

    pub fn is_tenant(&self, account: Address) -> bool {
        account == self.tenant
    }

    pub fn is_landlord(&self, account: Address) -> bool {
        account == self.landlord
    }

    /// Early termination costs two months of rent
    pub fn termination_fee(&self) -> U256 {
        self.rent_wei.saturating_mul(U256::from(2))
    }

    pub fn check_lock(&self) -> Result<(), GuardError> {
        if !self.both_signed() {
            return Err(GuardError::NotSignedForLock);
        }
        if self.locked {
            return Err(GuardError::AlreadyLocked);
        }
        Ok(())
    }

    pub fn check_pay(&self, account: Address, amount_wei: U256) -> Result<(), GuardError> {
        if !self.locked {
            return Err(GuardError::NotLockedForPayment);
        }
        if !self.is_tenant(account) {
            return Err(GuardError::NotTenantForPayment);
        }
        if amount_wei.is_zero() {
            return Err(GuardError::MissingAmount);
        }
        Ok(())
    }

    pub fn check_cancel(&self) -> Result<(), GuardError> {
        if self.locked {
            return Err(GuardError::LockedCannotCancel);
        }
        if !self.active {
            return Err(GuardError::Inactive);
        }
        Ok(())
    }

    pub fn check_terminate(&self, account: Address) -> Result<(), GuardError> {
        if !self.is_tenant(account) {
            return Err(GuardError::NotTenantForTermination);
        }
        if !self.active {
            return Err(GuardError::Inactive);
        }
        if !self.locked {
            return Err(GuardError::NotLockedForTermination);
        }
        if !self.both_signed() {
            return Err(GuardError::NotSignedForTermination);
        }
        if self.termination_fee().is_zero() {
            return Err(GuardError::ZeroRent);
        }
        Ok(())
    }

    pub fn check_update_rent(
        &self,
        account: Address,
        usd: f64,
        eth_usd: Option<f64>,
    ) -> Result<(), GuardError> {
        if !self.is_landlord(account) {
            return Err(GuardError::NotLandlord);
        }
        if usd.is_nan() || usd <= 0.0 {
            return Err(GuardError::NonPositiveRent);
        }
        if eth_usd.is_none() {
            return Err(GuardError::PriceUnavailable);
        }
        Ok(())
    }
}

/// One rent payment recorded by the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub amount_wei: U256,
    /// Unix seconds
    pub timestamp: u64,
}

pub fn total_paid(payments: &[Payment]) -> U256 {
    payments
        .iter()
        .fold(U256::ZERO, |sum, p| sum.saturating_add(p.amount_wei))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const LANDLORD: Address = address!("0x1000000000000000000000000000000000000001");
    const TENANT: Address = address!("0x2000000000000000000000000000000000000002");
    const STRANGER: Address = address!("0x3000000000000000000000000000000000000003");

    fn snapshot(ll: bool, tn: bool, locked: bool, active: bool, status: u8) -> ContractSnapshot {
        ContractSnapshot::from((
            LANDLORD,
            TENANT,
            U256::from(500_000_000_000_000_000u64),
            1_700_000_000,
            1_730_000_000,
            ll,
            tn,
            locked,
            active,
            status,
        ))
    }

    #[test]
    fn test_status_labels() {
        let labels: Vec<String> = (0u8..6).map(|c| ContractStatus::from(c).to_string()).collect();
        assert_eq!(
            labels,
            ["Created", "Signed", "Locked", "Cancelled", "Terminated", "Unknown"]
        );
        assert_eq!(ContractStatus::from(9), ContractStatus::Unknown(9));
    }

    #[test]
    fn test_lock_guard() {
        assert_eq!(snapshot(true, false, false, true, 0).check_lock(), Err(GuardError::NotSignedForLock));
        assert_eq!(snapshot(true, true, true, true, 2).check_lock(), Err(GuardError::AlreadyLocked));
        assert!(snapshot(true, true, false, true, 1).check_lock().is_ok());
    }

    #[test]
    fn test_pay_guard() {
        let locked = snapshot(true, true, true, true, 2);
        let rent = locked.rent_wei;
        assert!(locked.check_pay(TENANT, rent).is_ok());
        assert_eq!(locked.check_pay(LANDLORD, rent), Err(GuardError::NotTenantForPayment));
        assert_eq!(locked.check_pay(TENANT, U256::ZERO), Err(GuardError::MissingAmount));
        assert_eq!(
            snapshot(true, true, false, true, 1).check_pay(TENANT, rent),
            Err(GuardError::NotLockedForPayment)
        );
    }

    #[test]
    fn test_cancel_guard() {
        assert!(snapshot(false, false, false, true, 0).check_cancel().is_ok());
        assert_eq!(
            snapshot(true, true, true, true, 2).check_cancel(),
            Err(GuardError::LockedCannotCancel)
        );
        assert_eq!(snapshot(false, false, false, false, 3).check_cancel(), Err(GuardError::Inactive));
    }

    #[test]
    fn test_terminate_guard() {
        let locked = snapshot(true, true, true, true, 2);
        assert!(locked.check_terminate(TENANT).is_ok());
        assert_eq!(locked.check_terminate(STRANGER), Err(GuardError::NotTenantForTermination));
        assert_eq!(
            snapshot(true, true, false, true, 1).check_terminate(TENANT),
            Err(GuardError::NotLockedForTermination)
        );
        assert_eq!(
            snapshot(true, true, true, false, 4).check_terminate(TENANT),
            Err(GuardError::Inactive)
        );
        assert_eq!(
            snapshot(true, false, true, true, 2).check_terminate(TENANT),
            Err(GuardError::NotSignedForTermination)
        );
        assert_eq!(locked.termination_fee(), U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_update_rent_guard() {
        let s = snapshot(true, true, true, true, 2);
        assert!(s.check_update_rent(LANDLORD, 1200.0, Some(2500.0)).is_ok());
        assert_eq!(s.check_update_rent(TENANT, 1200.0, Some(2500.0)), Err(GuardError::NotLandlord));
        assert_eq!(s.check_update_rent(LANDLORD, 0.0, Some(2500.0)), Err(GuardError::NonPositiveRent));
        assert_eq!(s.check_update_rent(LANDLORD, f64::NAN, Some(2500.0)), Err(GuardError::NonPositiveRent));
        assert_eq!(s.check_update_rent(LANDLORD, 1200.0, None), Err(GuardError::PriceUnavailable));
    }

    #[test]
    fn test_total_paid() {
        let payments = [
            Payment { amount_wei: U256::from(3u64), timestamp: 1 },
            Payment { amount_wei: U256::from(4u64), timestamp: 2 },
        ];
        assert_eq!(total_paid(&payments), U256::from(7u64));
        assert_eq!(total_paid(&[]), U256::ZERO);
    }
}
