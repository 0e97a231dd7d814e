//! Conversions: REST order wire types → NormalizedOrder.
//!
//! The product code is translated back to a canonical pair, so conversion
//! fails for markets missing from the symbol table.

use super::wire::{ChildOrderResponse, ParentOrderResponse};
use super::{NormalizedOrder, OrderFamily};
use crate::domain::market::SymbolMap;
use crate::error::SymbolError;

impl TryFrom<(ChildOrderResponse, &SymbolMap)> for NormalizedOrder {
    type Error = SymbolError;

    fn try_from((order, symbols): (ChildOrderResponse, &SymbolMap)) -> Result<Self, Self::Error> {
        Ok(NormalizedOrder {
            pair: symbols.to_pair(&order.product_code)?.clone(),
            id: order.child_order_acceptance_id,
            family: OrderFamily::Child,
            open_time: order.child_order_date,
            close_time: None,
            side: order.side,
            price: order.price,
            volume: order.executed_size,
            outstanding_size: order.outstanding_size,
            state: order.child_order_state,
            order_type: order.child_order_type,
            average_price: order.average_price,
            fee: order.total_commission,
        })
    }
}

impl TryFrom<(ParentOrderResponse, &SymbolMap)> for NormalizedOrder {
    type Error = SymbolError;

    fn try_from(
        (order, symbols): (ParentOrderResponse, &SymbolMap),
    ) -> Result<Self, Self::Error> {
        Ok(NormalizedOrder {
            pair: symbols.to_pair(&order.product_code)?.clone(),
            id: order.parent_order_acceptance_id,
            family: OrderFamily::Parent,
            open_time: order.parent_order_date,
            close_time: None,
            side: order.side,
            price: order.price,
            volume: order.executed_size,
            outstanding_size: order.outstanding_size,
            state: order.parent_order_state,
            order_type: order.parent_order_type,
            average_price: order.average_price,
            fee: order.total_commission,
        })
    }
}
