// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.

/// Formats a tick value with the precision implied by the tick step and thousands grouping.
pub fn format_tick(value: f64, step: f64) -> String {
    format_grouped(value, precision_for_step(step))
}

/// Number of decimals needed to distinguish multiples of `step`.
pub fn precision_for_step(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    let exponent = step.log10().floor();
    if exponent >= 0.0 {
        0
    } else {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "negative exponent of a finite step, bounded by f64 range"
        )]
        let p = (-exponent) as usize;
        p.min(20)
    }
}

/// Formats with a fixed number of decimals and `,` between thousands.
pub fn format_grouped(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let fixed = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut grouped = String::with_capacity(fixed.len() + fixed.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }
    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    if value < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_follows_step() {
        assert_eq!(precision_for_step(10.0), 0);
        assert_eq!(precision_for_step(1.0), 0);
        assert_eq!(precision_for_step(0.2), 1);
        assert_eq!(precision_for_step(0.05), 2);
    }

    #[test]
    fn grouping_and_sign() {
        assert_eq!(format_tick(1_234_567.0, 1000.0), "1,234,567");
        assert_eq!(format_tick(-2500.0, 500.0), "-2,500");
        assert_eq!(format_tick(0.4, 0.2), "0.4");
        assert_eq!(format_tick(-0.0001, 1.0), "0");
        assert_eq!(format_tick(100.0, 20.0), "100");
    }
}
