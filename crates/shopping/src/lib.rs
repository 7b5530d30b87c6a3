//! Shopping domain module: grocery lines and checkout planning.
//!
//! Pure decisions only; the checkout transaction that talks to the list service
//! lives in `larder-infra`.

pub mod checkout;
pub mod grocery;

pub use checkout::{CartLine, CheckLine, CheckoutPlan};
pub use grocery::{GroceryLine, LineId, NewGroceryLine};
