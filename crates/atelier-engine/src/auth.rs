//! Caller roles for admin-gated operations.
//!
//! Token issuance and session mechanics live outside the engine; the
//! authentication layer hands us the caller's role and we gate on it.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// The caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Storefront customer.
    #[default]
    Customer,
    /// Shop staff: may run transitions and queue operations.
    Staff,
    /// Administrator.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Whether this role may mutate orders and the production queue.
    pub fn can_manage_orders(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

/// Gate an admin-only operation.
pub fn require_staff(role: Role, action: &str) -> Result<(), EngineError> {
    if role.can_manage_orders() {
        Ok(())
    } else {
        Err(EngineError::Unauthorized {
            role: role.as_str().to_string(),
            action: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_and_admin_pass() {
        assert!(require_staff(Role::Staff, "update status").is_ok());
        assert!(require_staff(Role::Admin, "update status").is_ok());
    }

    #[test]
    fn test_customer_rejected() {
        let err = require_staff(Role::Customer, "update status").unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
    }
}
