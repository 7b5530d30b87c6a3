//! Boolean capability checks used by callers to enable or hide actions.

use crate::{AuthzError, Permission, Principal, authorize};

/// An action a caller may want to offer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Open, use, move, split, break down or throw out pantry items.
    ModifyItems,
    Cook,
    /// Edit grocery lists and check out.
    Shop,
}

impl Capability {
    pub fn permission(self) -> Permission {
        match self {
            Capability::ModifyItems => Permission::ITEMS_MODIFY,
            Capability::Cook => Permission::COOK,
            Capability::Shop => Permission::SHOP,
        }
    }
}

/// Capabilities of one principal, resolved once.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Capabilities {
    modify_items: bool,
    cook: bool,
    shop: bool,
}

impl Capabilities {
    pub fn for_principal(principal: &Principal) -> Self {
        let allowed = |capability: Capability| authorize(principal, &capability.permission()).is_ok();
        Self {
            modify_items: allowed(Capability::ModifyItems),
            cook: allowed(Capability::Cook),
            shop: allowed(Capability::Shop),
        }
    }

    pub fn can_modify_items(&self) -> bool {
        self.modify_items
    }

    pub fn can_cook(&self) -> bool {
        self.cook
    }

    pub fn can_shop(&self) -> bool {
        self.shop
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ModifyItems => self.modify_items,
            Capability::Cook => self.cook,
            Capability::Shop => self.shop,
        }
    }

    pub fn require(&self, capability: Capability) -> Result<(), AuthzError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden(capability.permission().as_str().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemberId, PodMembership, PodRole};
    use larder_core::PodId;

    fn capabilities(role: PodRole) -> Capabilities {
        let pod_id = PodId::new();
        Capabilities::for_principal(&Principal {
            member_id: MemberId::new(),
            active_pod_id: pod_id,
            membership: PodMembership::new(pod_id, role),
        })
    }

    #[test]
    fn members_can_do_everything_in_the_kitchen() {
        let caps = capabilities(PodRole::Member);
        assert!(caps.can_modify_items() && caps.can_cook() && caps.can_shop());
        assert!(caps.require(Capability::Cook).is_ok());
    }

    #[test]
    fn guests_can_do_nothing() {
        let caps = capabilities(PodRole::Guest);
        assert!(!caps.can_modify_items());
        assert!(!caps.can_cook());
        assert_eq!(
            caps.require(Capability::Shop),
            Err(AuthzError::Forbidden("shopping.checkout".to_string()))
        );
    }

    #[test]
    fn wrong_pod_has_no_capabilities() {
        let pod_id = PodId::new();
        let caps = Capabilities::for_principal(&Principal {
            member_id: MemberId::new(),
            active_pod_id: PodId::new(),
            membership: PodMembership::new(pod_id, PodRole::Owner),
        });
        assert_eq!(caps, Capabilities::default());
    }
}
