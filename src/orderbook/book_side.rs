//! One side of the book: a priority queue of price levels plus a price lookup.

use super::error::OrderBookError;
use super::order::{Order, OrderId, Price, Side};
use super::price_level::PriceLevel;
use priority_queue::PriorityQueue;
use rust_decimal::Decimal;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::trace;

/// Matching priority of a level. Larger is better.
///
/// Bids use the price itself, asks its negation, so one max-queue serves both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct LevelPriority(Decimal);

/// Price levels of one side ordered best first.
///
/// `queue` drives matching; `levels` owns the [`PriceLevel`]s keyed by price
/// and serves lookups and ordered read-only walks without touching the
/// queue. Both always hold the same set of prices.
#[derive(Debug)]
pub(crate) struct BookSide {
    side: Side,
    queue: PriorityQueue<Price, LevelPriority>,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            queue: PriorityQueue::new(),
            levels: BTreeMap::new(),
        }
    }

    #[inline]
    fn priority(&self, price: Price) -> LevelPriority {
        match self.side {
            Side::Bid => LevelPriority(price),
            Side::Ask => LevelPriority(-price),
        }
    }

    /// Number of levels in the queue, stale ones included.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Price of the best non-empty level, discarding stale levels found on top.
    ///
    /// Every matching iteration starts here, so an emptied level is never
    /// returned as a match target.
    pub(crate) fn peek_best(&mut self) -> Option<Price> {
        loop {
            let price = *self.queue.peek()?.0;
            match self.levels.get(&price) {
                Some(level) if !level.is_empty() => return Some(price),
                _ => {
                    self.pop_best();
                }
            }
        }
    }

    /// Removes the best level from both the queue and the lookup.
    pub(crate) fn pop_best(&mut self) -> Option<PriceLevel> {
        let (price, _) = self.queue.pop()?;
        trace!("{} side: discarding level {}", self.side, price);
        self.levels.remove(&price)
    }

    /// Price of the best non-empty level without mutating the side.
    ///
    /// A stale top is skipped by walking on to the next live level.
    pub(crate) fn best_price(&self) -> Option<Price> {
        let (price, _) = self.queue.peek()?;
        match self.levels.get(price) {
            Some(level) if !level.is_empty() => Some(*price),
            _ => self.levels_by_priority().next().map(PriceLevel::price),
        }
    }

    /// Non-empty levels in matching priority order, walked lazily. Read-only.
    pub(crate) fn levels_by_priority(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        let levels: Box<dyn Iterator<Item = &PriceLevel> + '_> = match self.side {
            Side::Bid => Box::new(self.levels.values().rev()),
            Side::Ask => Box::new(self.levels.values()),
        };
        Box::new(levels.filter(|level| !level.is_empty()))
    }

    /// Number of non-empty levels.
    pub(crate) fn live_level_count(&self) -> usize {
        self.levels.values().filter(|level| !level.is_empty()).count()
    }

    #[inline]
    pub(crate) fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    #[inline]
    pub(crate) fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Appends a resting order to its level, creating the level on first use.
    ///
    /// On error the side is unchanged.
    pub(crate) fn insert_order(&mut self, order: &Order) -> Result<(), OrderBookError> {
        let price = order.price.ok_or_else(|| OrderBookError::MissingPrice {
            order_id: order.id.clone(),
        })?;
        match self.levels.entry(price) {
            Entry::Occupied(mut entry) => entry.get_mut().add_order(order)?,
            Entry::Vacant(entry) => {
                let mut level = PriceLevel::new(price);
                level.add_order(order)?;
                entry.insert(level);
                let priority = self.priority(price);
                self.queue.push(price, priority);
                trace!("{} side: new level {}", self.side, price);
            }
        }
        Ok(())
    }

    /// Removes the level at `price` from the queue and the lookup.
    pub(crate) fn retire(&mut self, price: Price) -> Option<PriceLevel> {
        self.queue.remove(&price);
        let level = self.levels.remove(&price);
        if level.is_some() {
            trace!("{} side: retired level {}", self.side, price);
        }
        level
    }

    /// Retires the level at `price` when it has become empty.
    pub(crate) fn retire_if_empty(&mut self, price: Price) -> bool {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.retire(price);
            true
        } else {
            false
        }
    }

    /// Checks the structural invariants of this side against the order index.
    pub(crate) fn check_invariants(
        &self,
        index: &HashMap<OrderId, Order>,
    ) -> Result<usize, OrderBookError> {
        let queued: HashSet<Price> = self.queue.iter().map(|(price, _)| *price).collect();
        let looked_up: HashSet<Price> = self.levels.keys().copied().collect();
        if queued != looked_up || queued.len() != self.queue.len() {
            return Err(OrderBookError::invariant(format!(
                "{} side: queue prices {:?} differ from lookup prices {:?}",
                self.side, queued, looked_up
            )));
        }

        let mut resting = 0;
        for (price, level) in &self.levels {
            if level.is_empty() {
                return Err(OrderBookError::invariant(format!(
                    "{} side: empty level {} is still reachable",
                    self.side, price
                )));
            }
            let mut quantity = Decimal::ZERO;
            for id in level.order_ids() {
                let order = index.get(id).ok_or_else(|| {
                    OrderBookError::invariant(format!(
                        "{} side: level {} references unknown order {}",
                        self.side, price, id
                    ))
                })?;
                if order.side != self.side || order.price != Some(*price) {
                    return Err(OrderBookError::invariant(format!(
                        "{} side: order {} filed under level {}",
                        self.side, order, price
                    )));
                }
                if order.status.is_terminal() || order.remaining() <= Decimal::ZERO {
                    return Err(OrderBookError::invariant(format!(
                        "{} side: finished order {} still resting at {}",
                        self.side, order, price
                    )));
                }
                quantity = quantity.saturating_add(order.remaining());
                resting += 1;
            }
            if quantity != level.total_quantity() {
                return Err(OrderBookError::invariant(format!(
                    "{} side: level {} caches {} but holds {}",
                    self.side,
                    price,
                    level.total_quantity(),
                    quantity
                )));
            }
        }
        Ok(resting)
    }
}
