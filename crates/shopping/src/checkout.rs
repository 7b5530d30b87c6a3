//! Checkout planning: which grocery lines move to the pantry, and what goes back on the list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, ListId};

use crate::grocery::{GroceryLine, LineId, NewGroceryLine};

/// A grocery line as it left the store: how many were needed, how many were bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub line: GroceryLine,
    pub needed: u32,
    pub acquired: u32,
}

impl CartLine {
    pub fn new(line: GroceryLine, acquired: u32) -> Self {
        let needed = line.quantity;
        Self {
            line,
            needed,
            acquired,
        }
    }

    pub fn shortfall(&self) -> u32 {
        self.needed.saturating_sub(self.acquired)
    }
}

/// A line to check off with the amount actually acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckLine {
    pub line_id: LineId,
    pub quantity: u32,
}

/// The two halves of a checkout: lines to check and move, lines to put back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPlan {
    pub to_check: Vec<CheckLine>,
    pub to_requeue: Vec<NewGroceryLine>,
}

impl CheckoutPlan {
    /// Plan a checkout of `cart` against `grocery_list`.
    ///
    /// Lines with `acquired > 0` are checked at the acquired amount. Lines with
    /// `acquired < needed` are re-added for the shortfall. A line can be both.
    pub fn from_cart(grocery_list: ListId, cart: &[CartLine]) -> DomainResult<Self> {
        if cart.is_empty() {
            return Err(DomainError::validation("cart is empty"));
        }

        let mut seen = HashSet::with_capacity(cart.len());
        let mut plan = CheckoutPlan::default();

        for entry in cart {
            if entry.line.list_id != grocery_list {
                return Err(DomainError::validation(format!(
                    "line {} is not on grocery list {grocery_list}",
                    entry.line.id
                )));
            }
            if !seen.insert(entry.line.id) {
                return Err(DomainError::validation(format!(
                    "line {} appears twice in the cart",
                    entry.line.id
                )));
            }
            if entry.needed == 0 {
                return Err(DomainError::validation("needed quantity must be at least 1"));
            }

            if entry.acquired > 0 {
                plan.to_check.push(CheckLine {
                    line_id: entry.line.id,
                    quantity: entry.acquired,
                });
            }

            let shortfall = entry.shortfall();
            if shortfall > 0 {
                plan.to_requeue.push(NewGroceryLine::new(
                    grocery_list,
                    entry.line.catalog.clone(),
                    shortfall,
                )?);
            }
        }

        Ok(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.to_check.is_empty() && self.to_requeue.is_empty()
    }

    /// Purchase units that will land in the pantry, saturating at `u32::MAX`.
    pub fn acquired_units(&self) -> u32 {
        self.to_check
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{AggregateId, CatalogItemId};
    use larder_inventory::{CatalogItem, Category, NewCatalogItem};

    fn catalog(name: &str) -> CatalogItem {
        CatalogItem::from_new(CatalogItemId::new(), NewCatalogItem::named(name, Category::Produce))
    }

    fn line(list_id: ListId, name: &str, quantity: u32) -> GroceryLine {
        let draft = NewGroceryLine::new(list_id, catalog(name), quantity).unwrap();
        GroceryLine::from_new(LineId::new(AggregateId::new()), draft)
    }

    #[test]
    fn partial_purchase_checks_acquired_and_requeues_shortfall() {
        let list = ListId::new();
        let apples = line(list, "Apples", 5);
        let cart = vec![CartLine::new(apples.clone(), 2)];

        let plan = CheckoutPlan::from_cart(list, &cart).unwrap();
        assert_eq!(
            plan.to_check,
            vec![CheckLine {
                line_id: apples.id,
                quantity: 2
            }]
        );
        assert_eq!(plan.to_requeue.len(), 1);
        assert_eq!(plan.to_requeue[0].quantity, 3);
        assert_eq!(plan.to_requeue[0].catalog, apples.catalog);
        assert_eq!(plan.to_requeue[0].list_id, list);
    }

    #[test]
    fn full_or_extra_purchase_requeues_nothing() {
        let list = ListId::new();
        let cart = vec![
            CartLine::new(line(list, "Limes", 2), 2),
            CartLine::new(line(list, "Onions", 1), 3),
        ];

        let plan = CheckoutPlan::from_cart(list, &cart).unwrap();
        assert!(plan.to_requeue.is_empty());
        assert_eq!(plan.acquired_units(), 5);
    }

    #[test]
    fn acquired_units_saturate_on_huge_carts() {
        let list = ListId::new();
        let cart = vec![
            CartLine::new(line(list, "Rice", 1), u32::MAX),
            CartLine::new(line(list, "Beans", 1), 2),
        ];

        let plan = CheckoutPlan::from_cart(list, &cart).unwrap();
        assert_eq!(plan.acquired_units(), u32::MAX);
    }

    #[test]
    fn nothing_acquired_requeues_the_whole_line() {
        let list = ListId::new();
        let cart = vec![CartLine::new(line(list, "Basil", 1), 0)];

        let plan = CheckoutPlan::from_cart(list, &cart).unwrap();
        assert!(plan.to_check.is_empty());
        assert_eq!(plan.to_requeue[0].quantity, 1);
        assert!(!plan.is_empty());
    }

    #[test]
    fn rejects_empty_foreign_and_duplicate_lines() {
        let list = ListId::new();
        assert!(CheckoutPlan::from_cart(list, &[]).is_err());

        let foreign = CartLine::new(line(ListId::new(), "Kale", 1), 1);
        match CheckoutPlan::from_cart(list, &[foreign]).unwrap_err() {
            DomainError::Validation(msg) if msg.contains("not on grocery list") => {}
            other => panic!("Expected Validation error, got {other:?}"),
        }

        let kale = CartLine::new(line(list, "Kale", 1), 1);
        let err = CheckoutPlan::from_cart(list, &[kale.clone(), kale]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: checked plus requeued quantity covers what was needed.
            #[test]
            fn checked_and_requeued_cover_needed(needed in 1u32..50, acquired in 0u32..60) {
                let list = ListId::new();
                let cart = vec![CartLine::new(line(list, "Pears", needed), acquired)];
                let plan = CheckoutPlan::from_cart(list, &cart).unwrap();

                let requeued: u32 = plan.to_requeue.iter().map(|l| l.quantity).sum();
                prop_assert_eq!(plan.acquired_units(), acquired);
                prop_assert_eq!(requeued, needed.saturating_sub(acquired));
                prop_assert!(plan.acquired_units() + requeued >= needed);
            }
        }
    }
}
