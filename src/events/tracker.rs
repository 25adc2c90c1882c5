//! Active-event bookkeeping for one scenario
//!
//! Active events live in a map of event id → years remaining. Triggering
//! applies full impact in the trigger year; every later active year applies
//! the event's recovery-factor multiplier (single-step decay, no further
//! attenuation). An already-active event is never re-triggered.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::events::catalog::{BlackSwanEvent, EventId};

/// Result of applying one year's events to an income/expense pair
#[derive(Debug, Clone, PartialEq)]
pub struct YearImpact {
    pub income: Decimal,
    pub expense: Decimal,
    /// Events that newly triggered this year
    pub triggered: Vec<EventId>,
}

/// Per-scenario map of active events
#[derive(Debug, Clone, Default)]
pub struct ActiveEventTracker {
    active: BTreeMap<EventId, u32>,
}

impl ActiveEventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: EventId) -> bool {
        self.active.contains_key(&id)
    }

    /// Apply one year of event activity
    ///
    /// `draws` holds one uniform draw per catalog event whose age range
    /// contains `age`, in catalog order; the caller owns the RNG so the
    /// tracker stays deterministic and testable.
    pub fn apply_year(
        &mut self,
        catalog: &[BlackSwanEvent],
        age: u8,
        draws: &[f64],
        income: Decimal,
        expense: Decimal,
    ) -> YearImpact {
        let mut result = YearImpact {
            income,
            expense,
            triggered: Vec::new(),
        };

        // Trigger phase: one draw per in-range event, duplicates suppressed
        let mut draw_iter = draws.iter();
        for event in catalog.iter().filter(|e| e.applies_at(age)) {
            let Some(&draw) = draw_iter.next() else {
                break;
            };
            if draw >= event.annual_probability || self.active.contains_key(&event.id) {
                continue;
            }

            apply_impact(&mut result, event, Decimal::ONE);
            result.triggered.push(event.id);
            if event.duration_years > 1 {
                self.active.insert(event.id, event.duration_years - 1);
            }
        }

        // Decay phase: events triggered in earlier years run at the
        // recovery-factor multiplier until their duration lapses
        let mut expired = Vec::new();
        for (&id, remaining) in self.active.iter_mut() {
            if result.triggered.contains(&id) {
                continue;
            }
            if let Some(event) = catalog.iter().find(|e| e.id == id) {
                apply_impact(&mut result, event, event.recovery_factor);
            }
            *remaining -= 1;
            if *remaining == 0 {
                expired.push(id);
            }
        }
        for id in expired {
            self.active.remove(&id);
        }

        result
    }

    /// Force an event into the active/triggered path, bypassing the draw
    ///
    /// Returns false when the event is already active.
    pub fn force_trigger(
        &mut self,
        event: &BlackSwanEvent,
        result: &mut YearImpact,
    ) -> bool {
        if self.active.contains_key(&event.id) {
            return false;
        }
        apply_impact(result, event, Decimal::ONE);
        result.triggered.push(event.id);
        if event.duration_years > 1 {
            self.active.insert(event.id, event.duration_years - 1);
        }
        true
    }
}

/// income *= max(0, 1 + impact × multiplier), likewise for expense
fn apply_impact(result: &mut YearImpact, event: &BlackSwanEvent, multiplier: Decimal) {
    let income_factor =
        (Decimal::ONE + event.income_impact * multiplier).max(Decimal::ZERO);
    let expense_factor =
        (Decimal::ONE + event.expense_impact * multiplier).max(Decimal::ZERO);
    result.income *= income_factor;
    result.expense *= expense_factor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::catalog::BlackSwanEvent;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn financial_crisis() -> BlackSwanEvent {
        BlackSwanEvent {
            id: EventId::FinancialCrisis,
            annual_probability: 0.008,
            duration_years: 2,
            recovery_factor: Decimal::new(80, 2),
            min_age: 30,
            max_age: 85,
            income_impact: Decimal::new(-40, 2),
            expense_impact: Decimal::ZERO,
        }
    }

    #[test]
    fn test_trigger_decay_expiry() {
        // Crisis forced in year 0 only: income 100,000 follows
        // 60,000 (full −40%), 68,000 (−40% × 0.8), 100,000 (expired)
        let catalog = vec![financial_crisis()];
        let mut tracker = ActiveEventTracker::new();

        let year0 = tracker.apply_year(&catalog, 40, &[0.0], dec(100_000), dec(50_000));
        assert_eq!(year0.income, dec(60_000));
        assert_eq!(year0.triggered, vec![EventId::FinancialCrisis]);

        let year1 = tracker.apply_year(&catalog, 41, &[0.99], dec(100_000), dec(50_000));
        assert_eq!(year1.income, dec(68_000));
        assert!(year1.triggered.is_empty());

        let year2 = tracker.apply_year(&catalog, 42, &[0.99], dec(100_000), dec(50_000));
        assert_eq!(year2.income, dec(100_000));
        assert!(!tracker.is_active(EventId::FinancialCrisis));
    }

    #[test]
    fn test_active_event_not_retriggered() {
        let catalog = vec![financial_crisis()];
        let mut tracker = ActiveEventTracker::new();

        tracker.apply_year(&catalog, 40, &[0.0], dec(100_000), dec(50_000));
        // Draw below probability again while active: decay applies, not a
        // second full hit
        let year1 = tracker.apply_year(&catalog, 41, &[0.0], dec(100_000), dec(50_000));
        assert_eq!(year1.income, dec(68_000));
        assert!(year1.triggered.is_empty());
    }

    #[test]
    fn test_out_of_range_consumes_no_draw() {
        let catalog = vec![financial_crisis()];
        let mut tracker = ActiveEventTracker::new();

        // Age below the window: nothing triggers even on a certain draw
        let result = tracker.apply_year(&catalog, 25, &[], dec(100_000), dec(50_000));
        assert_eq!(result.income, dec(100_000));
        assert!(result.triggered.is_empty());
    }

    #[test]
    fn test_single_year_event_never_becomes_active() {
        let event = BlackSwanEvent {
            duration_years: 1,
            ..financial_crisis()
        };
        let mut tracker = ActiveEventTracker::new();

        let year0 = tracker.apply_year(&[event.clone()], 40, &[0.0], dec(100_000), dec(50_000));
        assert_eq!(year0.income, dec(60_000));
        assert!(!tracker.is_active(event.id));
    }

    #[test]
    fn test_expense_impact_floor_at_zero() {
        let event = BlackSwanEvent {
            id: EventId::Hyperinflation,
            annual_probability: 1.0,
            duration_years: 1,
            recovery_factor: Decimal::ONE,
            min_age: 30,
            max_age: 85,
            income_impact: Decimal::from(-3), // −300%, floors at 0
            expense_impact: Decimal::new(25, 2),
        };
        let mut tracker = ActiveEventTracker::new();
        let result = tracker.apply_year(&[event], 40, &[0.5], dec(100_000), dec(40_000));
        assert_eq!(result.income, Decimal::ZERO);
        assert_eq!(result.expense, dec(50_000));
    }

    #[test]
    fn test_force_trigger_suppressed_when_active() {
        let catalog = vec![financial_crisis()];
        let mut tracker = ActiveEventTracker::new();
        let mut impact = YearImpact {
            income: dec(100_000),
            expense: dec(50_000),
            triggered: Vec::new(),
        };

        assert!(tracker.force_trigger(&catalog[0], &mut impact));
        assert!(!tracker.force_trigger(&catalog[0], &mut impact));
        assert_eq!(impact.income, dec(60_000));
    }
}
