//! Money calculation utilities using rust_decimal for precision
//!
//! 所有金额运算都在 `Decimal` 上进行，2 位小数、四舍五入 (half-up)。
//! 序列化/存储同样走十进制字符串，全链路不出现二进制浮点。

use rust_decimal::{Decimal, RoundingStrategy};

/// 金额统一保留 2 位小数
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary value (2 decimal places, half-up)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// 行小计 = 单价 × 数量
pub fn line_subtotal(unit_price: Decimal, quantity: i64) -> Decimal {
    round_money(unit_price * Decimal::from(quantity))
}

/// 合计若干行小计
pub fn sum_lines<I>(subtotals: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_money(subtotals.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        assert_eq!(line_subtotal(dec("9.50"), 2), dec("19.00"));
        assert_eq!(line_subtotal(dec("3.00"), 1), dec("3.00"));
    }

    #[test]
    fn worked_example_total() {
        // cart = [{9.50 × 2}, {3.00 × 1}] → 22.00
        let total = sum_lines([line_subtotal(dec("9.50"), 2), line_subtotal(dec("3.00"), 1)]);
        assert_eq!(total, dec("22.00"));
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
    }

    #[test]
    fn no_float_drift() {
        // 0.1 + 0.2 在十进制下精确等于 0.3
        let total = sum_lines([dec("0.1"), dec("0.2")]);
        assert_eq!(total, dec("0.30"));
    }
}
