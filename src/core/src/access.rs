//! Role-based access control.
//!
//! Roles are plain capabilities held in a table keyed by address. The
//! ledger and the pool consult the same table, so one grant surface
//! governs the whole system.

use crate::errors::CoreError;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// A named capability, grantable and revocable only by an admin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May grant and revoke roles, change the exchange rate, and sweep
    /// reserve custody.
    Admin,
    /// May mint ledger tokens.
    Minter,
    /// May pause and unpause the ledger.
    Pauser,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Minter => write!(f, "minter"),
            Role::Pauser => write!(f, "pauser"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "minter" => Ok(Role::Minter),
            "pauser" => Ok(Role::Pauser),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Role memberships, keyed by address.
///
/// Constructed with an initial admin; every later grant or revoke is
/// itself admin-gated. The table is never left without an admin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessControl {
    /// The set of roles held by each address
    roles: HashMap<Address, HashSet<Role>>,
}

impl AccessControl {
    /// Creates a role table whose only entry grants `initial_admin` the
    /// admin role.
    pub fn new(initial_admin: &Address) -> Self {
        let mut roles = HashMap::new();
        roles.insert(*initial_admin, HashSet::from([Role::Admin]));
        Self { roles }
    }

    /// Returns whether `address` holds `role`.
    pub fn has_role(&self, role: Role, address: &Address) -> bool {
        self.roles
            .get(address)
            .map_or(false, |held| held.contains(&role))
    }

    /// Returns the number of addresses currently holding the admin role.
    pub fn admin_count(&self) -> usize {
        self.roles
            .values()
            .filter(|held| held.contains(&Role::Admin))
            .count()
    }

    /// Fails with `PermissionDenied` unless `caller` holds `role`.
    pub fn require(&self, role: Role, caller: &Address) -> Result<(), CoreError> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(role))
        }
    }

    /// Grants `role` without an authorization check.
    ///
    /// Only for bootstrapping a table that no caller can reach yet;
    /// every post-construction grant goes through [`grant_role`].
    ///
    /// [`grant_role`]: AccessControl::grant_role
    pub(crate) fn grant_unchecked(&mut self, role: Role, address: &Address) {
        self.roles.entry(*address).or_default().insert(role);
    }

    /// Grants `role` to `address`. Admin-gated.
    ///
    /// Granting a role the address already holds is a no-op success.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        address: &Address,
    ) -> Result<(), CoreError> {
        self.require(Role::Admin, caller)?;
        self.roles.entry(*address).or_default().insert(role);
        Ok(())
    }

    /// Revokes `role` from `address`. Admin-gated.
    ///
    /// Revoking a role the address does not hold is a no-op success.
    /// Revoking the last admin fails, so the table always retains at
    /// least one.
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        address: &Address,
    ) -> Result<(), CoreError> {
        self.require(Role::Admin, caller)?;

        if role == Role::Admin && self.has_role(Role::Admin, address) && self.admin_count() == 1 {
            return Err(CoreError::InvariantViolation(
                "revoking the last admin would leave the role table empty".to_string(),
            ));
        }

        if let Some(held) = self.roles.get_mut(address) {
            held.remove(&role);
            if held.is_empty() {
                self.roles.remove(address);
            }
        }
        Ok(())
    }
}
