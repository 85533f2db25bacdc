//! Seams between the controller and the host simulation.
//!
//! These traits live in `limo-common` so that the pathfinder, the
//! coordinator and any host binding can share them without depending on
//! each other.

use crate::{GridPosition, Order, Result};

/// Read-only view of the map that the pathfinder needs.
pub trait GridMap {
    /// Whether a limo can drive onto this tile. Off-map tiles are never
    /// traversable.
    fn is_traversable(&self, pos: GridPosition) -> bool;

    /// Topology version. Must change whenever traversability changes so
    /// cached paths can be dropped.
    fn revision(&self) -> u64 {
        0
    }
}

impl<M: GridMap + ?Sized> GridMap for &M {
    fn is_traversable(&self, pos: GridPosition) -> bool {
        (**self).is_traversable(pos)
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }
}

/// Where the controller sends its orders.
pub trait OrderSink {
    fn send(&mut self, order: Order) -> Result<()>;
}

impl OrderSink for Vec<Order> {
    fn send(&mut self, order: Order) -> Result<()> {
        self.push(order);
        Ok(())
    }
}

/// Adapts a closure into an [`OrderSink`].
pub struct FnSink<F>(pub F);

impl<F> OrderSink for FnSink<F>
where
    F: FnMut(Order) -> Result<()>,
{
    fn send(&mut self, order: Order) -> Result<()> {
        (self.0)(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderKind;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Order> = Vec::new();
        sink.send(Order::ready(vec![], vec![])).unwrap();
        sink.send(Order::moving(vec![GridPosition::new(1, 1)], vec![]))
            .unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].kind, OrderKind::Move);
    }

    #[test]
    fn test_fn_sink_forwards() {
        let mut seen = 0;
        {
            let mut sink = FnSink(|order: Order| {
                assert_eq!(order.kind, OrderKind::Ready);
                seen += 1;
                Ok(())
            });
            sink.send(Order::ready(vec![], vec![])).unwrap();
        }
        assert_eq!(seen, 1);
    }
}
