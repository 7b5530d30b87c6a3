//! `larder-auth`: pod roles, permissions and capability checks.
//!
//! Pure policy: no storage, no transport. Callers consult it before invoking an
//! engine operation; the engine itself never does.

pub mod authorize;
pub mod capabilities;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, Principal, authorize};
pub use capabilities::{Capabilities, Capability};
pub use permissions::Permission;
pub use principal::{MemberId, PodMembership};
pub use roles::PodRole;
