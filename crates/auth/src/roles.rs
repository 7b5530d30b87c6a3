use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role of a member within a pod.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodRole {
    Owner,
    Member,
    /// Can look, not touch.
    Guest,
}

impl PodRole {
    pub fn as_str(self) -> &'static str {
        match self {
            PodRole::Owner => "owner",
            PodRole::Member => "member",
            PodRole::Guest => "guest",
        }
    }

    /// Permissions granted by the role.
    pub fn permissions(self) -> Vec<Permission> {
        match self {
            PodRole::Owner => vec![Permission::WILDCARD],
            PodRole::Member => vec![
                Permission::LISTS_READ,
                Permission::ITEMS_MODIFY,
                Permission::COOK,
                Permission::SHOP,
            ],
            PodRole::Guest => vec![Permission::LISTS_READ],
        }
    }
}

impl core::fmt::Display for PodRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PodRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(PodRole::Owner),
            "member" => Ok(PodRole::Member),
            "guest" => Ok(PodRole::Guest),
            other => Err(format!("unknown pod role '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_their_names() {
        for role in [PodRole::Owner, PodRole::Member, PodRole::Guest] {
            assert_eq!(role.as_str().parse::<PodRole>(), Ok(role));
        }
        assert!("chef".parse::<PodRole>().is_err());
    }

    #[test]
    fn guests_only_read() {
        assert_eq!(PodRole::Guest.permissions(), vec![Permission::LISTS_READ]);
    }
}
