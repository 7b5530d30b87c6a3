//! Checkout of a shopping trip: check acquired lines, move them to the pantry,
//! put shortfalls back on the grocery list.
//!
//! Per-line failures of the first and last step are collected, and a failed move
//! does not stop the re-queue. Nothing is rolled back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{ListId, PodId};
use larder_inventory::InventoryItem;
use larder_shopping::{CartLine, CheckoutPlan, GroceryLine, LineId};

use crate::collaborators::{ListService, TransportError};
use crate::error::EngineError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    CheckLine,
    MoveToPantry,
    Requeue,
}

/// One collaborator call of a checkout that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFailure {
    pub step: CheckoutStep,
    /// Absent for the bulk move and for lines that were never created.
    pub line_id: Option<LineId>,
    pub name: String,
    pub error: TransportError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutResult {
    pub moved: Vec<InventoryItem>,
    pub requeued: Vec<GroceryLine>,
    pub failures: Vec<CheckoutFailure>,
}

impl CheckoutResult {
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The checkout transaction.
#[derive(Debug)]
pub struct CheckoutTransaction<L> {
    lists: L,
}

impl<L> CheckoutTransaction<L> {
    pub fn new(lists: L) -> Self {
        Self { lists }
    }

    pub fn lists(&self) -> &L {
        &self.lists
    }
}

impl<L> CheckoutTransaction<L>
where
    L: ListService,
{
    /// Check out `cart` from `grocery_list` into `pantry_list`.
    ///
    /// Returns `Err` only for an invalid cart, before any call is made.
    pub fn checkout_grocery_list(
        &self,
        pod_id: PodId,
        grocery_list: ListId,
        pantry_list: ListId,
        cart: &[CartLine],
        now: DateTime<Utc>,
    ) -> Result<CheckoutResult, EngineError> {
        let plan = CheckoutPlan::from_cart(grocery_list, cart)?;
        let mut result = CheckoutResult::default();

        // 1) check what was bought, at the amount bought
        for check in &plan.to_check {
            let Some(entry) = cart.iter().find(|c| c.line.id == check.line_id) else {
                continue;
            };
            let mut line = entry.line.clone();
            line.mark_acquired(check.quantity)?;
            if let Err(error) = self.lists.update_grocery_line(pod_id, &line) {
                tracing::warn!(pod_id = %pod_id, line_id = %line.id, error = %error, "grocery line not checked");
                result.failures.push(CheckoutFailure {
                    step: CheckoutStep::CheckLine,
                    line_id: Some(line.id),
                    name: line.catalog.name.clone(),
                    error,
                });
            }
        }

        // 2) bulk move; clears the grocery list
        match self.lists.checkout(pod_id, grocery_list, pantry_list, now) {
            Ok(moved) => result.moved = moved,
            Err(error) => {
                tracing::warn!(pod_id = %pod_id, error = %error, "move to pantry failed; re-queue continues");
                result.failures.push(CheckoutFailure {
                    step: CheckoutStep::MoveToPantry,
                    line_id: None,
                    name: String::new(),
                    error,
                });
            }
        }

        // 3) put the shortfall back
        for draft in plan.to_requeue {
            let name = draft.catalog.name.clone();
            match self.lists.add_grocery_line(pod_id, draft) {
                Ok(line) => result.requeued.push(line),
                Err(error) => {
                    tracing::warn!(pod_id = %pod_id, name = %name, error = %error, "shortfall not re-queued");
                    result.failures.push(CheckoutFailure {
                        step: CheckoutStep::Requeue,
                        line_id: None,
                        name,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            pod_id = %pod_id,
            moved = result.moved_count(),
            requeued = result.requeued.len(),
            failures = result.failures.len(),
            "checkout finished"
        );
        Ok(result)
    }
}
