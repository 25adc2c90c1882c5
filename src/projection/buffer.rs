//! Bridge-period safety-buffer months
//!
//! Between the expected FIRE age and legal pension eligibility the plan is
//! entirely self-funded, so the base buffer grows by the present value of
//! twelve months per remaining bridge year, discounted as an annuity due.

use rust_decimal::{Decimal, MathematicalOps};

use crate::profile::UserProfile;

const TWELVE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Required buffer months at a given age
///
/// Outside `[fire_age, legal_retirement_age)`, or when no legal retirement
/// age is set, this is the profile's base buffer unchanged. Inside the
/// window, at a 0% discount rate the add-on equals `remaining_years × 12`;
/// any positive rate strictly lowers it.
pub fn required_buffer_months(profile: &UserProfile, age: u8) -> Decimal {
    let base = Decimal::from(profile.safety_buffer_months());

    let Some(retirement_age) = profile.legal_retirement_age() else {
        return base;
    };
    if age < profile.expected_fire_age() || age >= retirement_age {
        return base;
    }

    let remaining_years = u32::from(retirement_age - age);
    let rate = profile.bridge_discount_rate();

    let mut add_on = Decimal::ZERO;
    if rate <= Decimal::ZERO {
        add_on = TWELVE * Decimal::from(remaining_years);
    } else {
        let factor = Decimal::ONE + rate;
        for k in 0..remaining_years {
            add_on += TWELVE / factor.powi(i64::from(k));
        }
    }

    base + add_on
}
