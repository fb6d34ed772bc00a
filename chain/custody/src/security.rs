//! Security primitives shared by the custody pipelines
//!
//! - `ReentrancyGuard`: one exclusive execution lock per custody instance,
//!   reject-on-conflict, released by a scope token on every exit path.
//! - `AccessControl`: reference [`Authorizer`] with two privilege tiers.
//! - `PauseGuard`: reference [`PauseState`] switch.
//!
//! The guards use `Cell`/`RefCell` because collaborators re-enter the custody
//! through shared references; execution is single-threaded and serialized.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use types::ids::AccountId;

use crate::collaborators::{AuthorizationDenied, Authorizer, PauseState};

/// Non-reentrancy lock.
///
/// `enter` hands out an [`EntryScope`]; the lock is released when the scope
/// is dropped, whether the guarded call returned `Ok` or `Err`.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    locked: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock. Returns `None` if it is already held.
    pub fn enter(&self) -> Option<EntryScope<'_>> {
        if self.locked.replace(true) {
            debug!("reentrant entry rejected");
            return None;
        }
        Some(EntryScope { guard: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

/// Proof that the reentrancy lock is held. Releases it on drop.
#[derive(Debug)]
pub struct EntryScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for EntryScope<'_> {
    fn drop(&mut self) {
        self.guard.locked.set(false);
    }
}

/// Privilege tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Grants roles; satisfies every role check
    Admin,
    /// Adjusts operational limits
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Operator => write!(f, "Operator"),
        }
    }
}

/// Role-based access control.
///
/// Maps accounts to their assigned role. Only an admin can grant roles.
#[derive(Debug)]
pub struct AccessControl {
    roles: RefCell<HashMap<AccountId, Role>>,
    admin: AccountId,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: AccountId) -> Self {
        let mut roles = HashMap::new();
        roles.insert(admin, Role::Admin);
        Self {
            roles: RefCell::new(roles),
            admin,
        }
    }

    /// Check if an account holds the role. Admin holds every role.
    pub fn has_role(&self, account: &AccountId, role: Role) -> bool {
        match self.roles.borrow().get(account) {
            Some(Role::Admin) => true,
            Some(held) => *held == role,
            None => false,
        }
    }

    pub fn admin(&self) -> AccountId {
        self.admin
    }
}

impl Authorizer for AccessControl {
    fn authorize(&self, caller: &AccountId, role: Role) -> Result<(), AuthorizationDenied> {
        if self.has_role(caller, role) {
            return Ok(());
        }
        Err(AuthorizationDenied {
            caller: *caller,
            missing: role,
        })
    }

    fn grant(
        &self,
        grantor: &AccountId,
        grantee: AccountId,
        role: Role,
    ) -> Result<(), AuthorizationDenied> {
        self.authorize(grantor, Role::Admin)?;
        self.roles.borrow_mut().insert(grantee, role);
        Ok(())
    }
}

/// Global pause switch.
#[derive(Debug, Default)]
pub struct PauseGuard {
    paused: Cell<bool>,
}

impl PauseGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn unpause(&self) {
        self.paused.set(false);
    }
}

impl PauseState for PauseGuard {
    fn is_paused(&self) -> bool {
        self.paused.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ReentrancyGuard tests ---

    #[test]
    fn test_reentrancy_guard_enter_and_drop() {
        let guard = ReentrancyGuard::new();
        assert!(!guard.is_locked());
        {
            let _scope = guard.enter().unwrap();
            assert!(guard.is_locked());
        }
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_reentrancy_guard_nested_enter_fails() {
        let guard = ReentrancyGuard::new();
        let _scope = guard.enter().unwrap();
        assert!(guard.enter().is_none(), "Second enter must fail");
        assert!(guard.is_locked(), "Rejected enter must not release the lock");
    }

    #[test]
    fn test_reentrancy_guard_released_on_error_path() {
        fn guarded(guard: &ReentrancyGuard) -> Result<(), &'static str> {
            let _scope = guard.enter().ok_or("locked")?;
            Err("failed inside")
        }

        let guard = ReentrancyGuard::new();
        assert_eq!(guarded(&guard), Err("failed inside"));
        assert!(!guard.is_locked());
        assert!(guard.enter().is_some());
    }

    // --- AccessControl tests ---

    #[test]
    fn test_access_control_admin_holds_every_role() {
        let admin = AccountId::new();
        let ac = AccessControl::new(admin);
        assert!(ac.has_role(&admin, Role::Admin));
        assert!(ac.has_role(&admin, Role::Operator));
        assert_eq!(ac.admin(), admin);
    }

    #[test]
    fn test_access_control_grant_operator() {
        let admin = AccountId::new();
        let operator = AccountId::new();
        let ac = AccessControl::new(admin);

        ac.grant(&admin, operator, Role::Operator).unwrap();
        assert!(ac.authorize(&operator, Role::Operator).is_ok());
        assert_eq!(
            ac.authorize(&operator, Role::Admin),
            Err(AuthorizationDenied {
                caller: operator,
                missing: Role::Admin
            })
        );
    }

    #[test]
    fn test_access_control_non_admin_cannot_grant() {
        let ac = AccessControl::new(AccountId::new());
        let mallory = AccountId::new();
        let result = ac.grant(&mallory, mallory, Role::Operator);
        assert_eq!(
            result,
            Err(AuthorizationDenied {
                caller: mallory,
                missing: Role::Admin
            })
        );
        assert!(!ac.has_role(&mallory, Role::Operator));
    }

    // --- PauseGuard tests ---

    #[test]
    fn test_pause_guard() {
        let pg = PauseGuard::new();
        assert!(!pg.is_paused());
        pg.pause();
        assert!(pg.is_paused());
        pg.unpause();
        assert!(!pg.is_paused());
    }
}
