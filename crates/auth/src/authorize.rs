use thiserror::Error;

use larder_core::PodId;

use crate::{MemberId, Permission, PodMembership};

/// A resolved member acting within a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub member_id: MemberId,
    pub active_pod_id: PodId,
    pub membership: PodMembership,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("pod mismatch")]
    PodMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal within its active pod.
///
/// - No IO
/// - No panics
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.active_pod_id != principal.membership.pod_id {
        return Err(AuthzError::PodMismatch);
    }

    let granted = principal
        .membership
        .effective_permissions()
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PodRole;

    fn principal(role: PodRole) -> Principal {
        let pod_id = PodId::new();
        Principal {
            member_id: MemberId::new(),
            active_pod_id: pod_id,
            membership: PodMembership::new(pod_id, role),
        }
    }

    #[test]
    fn owner_wildcard_grants_everything() {
        let owner = principal(PodRole::Owner);
        assert!(authorize(&owner, &Permission::POD_MANAGE).is_ok());
        assert!(authorize(&owner, &Permission::new("anything.at.all")).is_ok());
    }

    #[test]
    fn guest_is_forbidden_from_modifying() {
        let guest = principal(PodRole::Guest);
        match authorize(&guest, &Permission::ITEMS_MODIFY) {
            Err(AuthzError::Forbidden(p)) if p == "pantry.items.modify" => {}
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn individual_grants_extend_the_role() {
        let mut guest = principal(PodRole::Guest);
        guest.membership = guest.membership.clone().with_permission(Permission::SHOP);
        assert!(authorize(&guest, &Permission::SHOP).is_ok());
        assert!(authorize(&guest, &Permission::COOK).is_err());
    }

    #[test]
    fn acting_in_another_pod_is_rejected() {
        let mut member = principal(PodRole::Member);
        member.active_pod_id = PodId::new();
        assert_eq!(authorize(&member, &Permission::COOK), Err(AuthzError::PodMismatch));
    }
}
