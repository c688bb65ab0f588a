use super::error::TaxError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest amount, in dollars either side of zero, accepted for calculation.
/// Tax on an amount within the bound, and sums of such amounts, stay well
/// inside the range of `Decimal`.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Pass `amount` through if its magnitude is within [`MAX_AMOUNT`]
pub fn check_amount(amount: Decimal) -> Result<Decimal, TaxError> {
    if amount.abs() > MAX_AMOUNT {
        Err(TaxError::AmountOutOfRange(amount))
    } else {
        Ok(amount)
    }
}

/// Round to cents, half away from zero.
///
/// `Decimal::round_dp` rounds half to even, which turns 9.975 into 9.98 but
/// 0.125 into 0.12. Sales tax is rounded half-up on the cent, and the
/// strategy is symmetric so negated amounts round to the negated result.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as dollars, e.g. `$1,234.50` or `-$3.00`
pub fn format_cad(amount: Decimal) -> String {
    let rounded = round2(amount);
    let abs = format!("{:.2}", rounded.abs());
    let (whole, cents) = abs.split_once('.').unwrap_or((abs.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}.{}", grouped, cents)
    } else {
        format!("${}.{}", grouped, cents)
    }
}

/// Format a rate fraction as a percentage, trimming trailing zeros (0.09975 -> "9.975%")
pub fn format_rate(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED).normalize();
    format!("{}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_up_on_the_cent() {
        assert_eq!(round2(dec!(9.975)), dec!(9.98));
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(4.3329)), dec!(4.33));
    }

    #[test]
    fn rounding_is_symmetric_in_sign() {
        assert_eq!(round2(dec!(-9.975)), dec!(-9.98));
        assert_eq!(round2(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn formats_dollars_with_grouping() {
        assert_eq!(format_cad(dec!(0)), "$0.00");
        assert_eq!(format_cad(dec!(13)), "$13.00");
        assert_eq!(format_cad(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_cad(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_cad(dec!(-65)), "-$65.00");
    }

    #[test]
    fn formats_rates_as_percentages() {
        assert_eq!(format_rate(dec!(0.13)), "13%");
        assert_eq!(format_rate(dec!(0.09975)), "9.975%");
        assert_eq!(format_rate(dec!(0.14975)), "14.975%");
        assert_eq!(format_rate(dec!(0)), "0%");
    }

    #[test]
    fn amounts_beyond_the_limit_are_rejected() {
        assert_eq!(check_amount(MAX_AMOUNT), Ok(MAX_AMOUNT));
        assert_eq!(check_amount(-MAX_AMOUNT), Ok(-MAX_AMOUNT));
        assert_eq!(
            check_amount(Decimal::MAX),
            Err(TaxError::AmountOutOfRange(Decimal::MAX))
        );
        assert!(check_amount(-MAX_AMOUNT - dec!(0.01)).is_err());
    }
}
