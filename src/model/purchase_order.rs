// src/model/purchase_order.rs

use serde::Serialize;

/// An order for `quantity` fresh items to arrive on `scheduled_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurchaseOrder {
    pub scheduled_day: u32,
    pub quantity: u32,
}

impl PurchaseOrder {
    pub fn new(scheduled_day: u32, quantity: u32) -> Self {
        Self {
            scheduled_day,
            quantity,
        }
    }

    pub fn get(&self, field: OrderField) -> u32 {
        match field {
            OrderField::ScheduledDay => self.scheduled_day,
            OrderField::Quantity => self.quantity,
        }
    }

    pub fn set(&mut self, field: OrderField, value: u32) {
        match field {
            OrderField::ScheduledDay => self.scheduled_day = value,
            OrderField::Quantity => self.quantity = value,
        }
    }

    /// Moves `field` by `step`, clamping at 0.
    pub fn nudge(&mut self, field: OrderField, step: i64) {
        let value = (i64::from(self.get(field)) + step).clamp(0, i64::from(u32::MAX));
        self.set(field, value as u32);
    }
}

/// The tunable numeric fields of a [`PurchaseOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrderField {
    ScheduledDay,
    Quantity,
}

impl OrderField {
    pub const ALL: [OrderField; 2] = [OrderField::ScheduledDay, OrderField::Quantity];
}

/// Evenly spaced orders of the same size, e.g. one every 30 days for a year.
pub fn recurring_orders(first_day: u32, last_day: u32, every: u32, quantity: u32) -> Vec<PurchaseOrder> {
    (first_day..last_day)
        .step_by(every.max(1) as usize)
        .map(|day| PurchaseOrder::new(day, quantity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_and_setter_address_the_right_field() {
        let mut order = PurchaseOrder::new(5, 3);
        assert_eq!(order.get(OrderField::ScheduledDay), 5);
        assert_eq!(order.get(OrderField::Quantity), 3);

        order.set(OrderField::Quantity, 9);
        assert_eq!(order, PurchaseOrder::new(5, 9));
    }

    #[test]
    fn nudge_clamps_at_zero() {
        let mut order = PurchaseOrder::new(0, 1);
        order.nudge(OrderField::ScheduledDay, -1);
        order.nudge(OrderField::Quantity, -1);
        order.nudge(OrderField::Quantity, -1);
        assert_eq!(order, PurchaseOrder::new(0, 0));

        order.nudge(OrderField::ScheduledDay, 1);
        assert_eq!(order.scheduled_day, 1);
    }

    #[test]
    fn recurring_orders_cover_the_range() {
        let orders = recurring_orders(0, 365, 30, 20);
        assert_eq!(orders.len(), 13);
        assert_eq!(orders[0], PurchaseOrder::new(0, 20));
        assert_eq!(orders[12], PurchaseOrder::new(360, 20));
    }
}
