use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "pantry.items.modify"). The wildcard
/// `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));
    pub const LISTS_READ: Permission = Permission(Cow::Borrowed("lists.read"));
    pub const ITEMS_MODIFY: Permission = Permission(Cow::Borrowed("pantry.items.modify"));
    pub const COOK: Permission = Permission(Cow::Borrowed("cooking.cook"));
    pub const SHOP: Permission = Permission(Cow::Borrowed("shopping.checkout"));
    pub const POD_MANAGE: Permission = Permission(Cow::Borrowed("pod.manage"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_compare_equal_to_owned_names() {
        assert_eq!(Permission::new(String::from("cooking.cook")), Permission::COOK);
        assert!(Permission::WILDCARD.is_wildcard());
        assert_eq!(
            serde_json::to_value(&Permission::SHOP).unwrap(),
            serde_json::json!("shopping.checkout")
        );
    }
}
