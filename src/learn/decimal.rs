//! Fixed-point number rendering for training files and model names.
//!
//! Values are rounded half-up on their shortest round-trip decimal digits,
//! so `0.015625` at five places is `0.01563` and `0.15` at one place is `0.2`.
//! Non-finite values render as `NaN`, `Infinity` and `-Infinity`.

use std::fmt;

/// `value` with exactly `places` digits after the decimal point.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub f64, pub usize);

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Fixed(value, places) = *self;
        if value.is_nan() {
            return f.write_str("NaN");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-Infinity" } else { "Infinity" });
        }
        if value.is_sign_negative() {
            f.write_str("-")?;
        }
        f.write_str(&round_half_up(value.abs(), places))
    }
}

/// Render a finite, non-negative value.
fn round_half_up(value: f64, places: usize) -> String {
    // Shortest round-trip digits: "d.ddde<exp>"
    let sci = format!("{:e}", value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i64 = exp.parse().unwrap_or(0);
    let digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();

    // value = 0.d1d2d3... * 10^(exp + 1); keep digits up to `places` decimals
    let keep = exp + 1 + places as i64;
    let mut scaled: Vec<u8> = if keep < 0 {
        Vec::new()
    } else {
        let keep = keep as usize;
        if keep >= digits.len() {
            let mut all = digits.clone();
            all.resize(keep, b'0');
            all
        } else {
            let mut kept = digits[..keep].to_vec();
            if digits[keep] >= b'5' {
                carry(&mut kept);
            }
            kept
        }
    };

    // `scaled` is the value times 10^places, as decimal digits
    if scaled.len() < places + 1 {
        let mut padded = vec![b'0'; places + 1 - scaled.len()];
        padded.append(&mut scaled);
        scaled = padded;
    }
    let split = scaled.len() - places;
    let int_start = scaled[..split - 1].iter().take_while(|&&d| d == b'0').count();

    let mut out = String::with_capacity(scaled.len() + 1);
    out.extend(scaled[int_start..split].iter().map(|&d| d as char));
    if places > 0 {
        out.push('.');
        out.extend(scaled[split..].iter().map(|&d| d as char));
    }
    out
}

/// Add one unit in the last place.
fn carry(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(value: f64, places: usize) -> String {
        Fixed(value, places).to_string()
    }

    #[test]
    fn ties_round_up() {
        assert_eq!(fixed(0.015625, 5), "0.01563");
        assert_eq!(fixed(0.0009765625, 9), "0.000976563");
        assert_eq!(fixed(0.125, 2), "0.13");
        assert_eq!(fixed(1.005, 2), "1.01");
        assert_eq!(fixed(0.15, 1), "0.2");
        assert_eq!(fixed(2.5, 0), "3");
    }

    #[test]
    fn below_tie_rounds_down() {
        assert_eq!(fixed(0.0156249, 5), "0.01562");
        assert_eq!(fixed(1.23456, 3), "1.235");
        assert_eq!(fixed(1.2344, 3), "1.234");
    }

    #[test]
    fn pads_and_carries() {
        assert_eq!(fixed(1.0, 5), "1.00000");
        assert_eq!(fixed(0.0, 9), "0.000000000");
        assert_eq!(fixed(0.2, 9), "0.200000000");
        assert_eq!(fixed(0.999999, 5), "1.00000");
        assert_eq!(fixed(99.9999996, 6), "100.000000");
        assert_eq!(fixed(1234.5, 1), "1234.5");
        assert_eq!(fixed(1e21, 2), "1000000000000000000000.00");
    }

    #[test]
    fn tiny_values() {
        assert_eq!(fixed(0.000006, 5), "0.00001");
        assert_eq!(fixed(0.000004, 5), "0.00000");
        assert_eq!(fixed(1e-20, 9), "0.000000000");
    }

    #[test]
    fn signs_and_specials() {
        assert_eq!(fixed(-1.0, 5), "-1.00000");
        assert_eq!(fixed(-0.015625, 5), "-0.01563");
        assert_eq!(fixed(-0.0, 2), "-0.00");
        assert_eq!(fixed(f64::NAN, 5), "NaN");
        assert_eq!(fixed(f64::INFINITY, 9), "Infinity");
        assert_eq!(fixed(f64::NEG_INFINITY, 9), "-Infinity");
    }
}
