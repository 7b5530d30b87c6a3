use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_core::PodId;

use crate::{Permission, PodRole};

/// Identity of a pod member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for MemberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A member's standing in one pod: its role plus any individually granted permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodMembership {
    pub pod_id: PodId,
    pub role: PodRole,
    #[serde(default)]
    pub extra_permissions: Vec<Permission>,
}

impl PodMembership {
    pub fn new(pod_id: PodId, role: PodRole) -> Self {
        Self {
            pod_id,
            role,
            extra_permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.extra_permissions.push(permission);
        self
    }

    /// Role permissions followed by the individual grants.
    pub fn effective_permissions(&self) -> Vec<Permission> {
        let mut permissions = self.role.permissions();
        for extra in &self.extra_permissions {
            if !permissions.contains(extra) {
                permissions.push(extra.clone());
            }
        }
        permissions
    }
}
