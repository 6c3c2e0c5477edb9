//! Digits of the `Long` encoding: 15-bit, least significant first.

const SHIFT: u32 = 15;
const MASK: u64 = (1 << SHIFT) - 1;
const BASE: u32 = 1 << SHIFT;

pub(super) fn from_u64(mut magnitude: u64) -> Vec<u16> {
    let mut digits = Vec::new();
    while magnitude != 0 {
        digits.push((magnitude & MASK) as u16);
        magnitude >>= SHIFT;
    }
    digits
}

/// Digits of an unsigned decimal magnitude.
pub(super) fn from_decimal(decimal: &str) -> Vec<u16> {
    let mut remaining: Vec<u32> = decimal
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| u32::from(b - b'0'))
        .collect();

    let mut digits = Vec::new();
    while remaining.iter().any(|&d| d != 0) {
        let mut rem = 0;
        for d in remaining.iter_mut() {
            let cur = rem * 10 + *d;
            *d = cur / BASE;
            rem = cur % BASE;
        }
        digits.push(rem as u16);
    }
    digits
}

pub(super) fn to_decimal(digits: &[u16]) -> String {
    // Base 10, least significant first.
    let mut decimal: Vec<u32> = Vec::new();
    for &digit in digits.iter().rev() {
        let mut carry = u32::from(digit);
        for d in decimal.iter_mut() {
            let cur = *d * BASE + carry;
            *d = cur % 10;
            carry = cur / 10;
        }
        while carry != 0 {
            decimal.push(carry % 10);
            carry /= 10;
        }
    }
    if decimal.is_empty() {
        return "0".to_string();
    }
    decimal.iter().rev().map(|&d| char::from(b'0' + d as u8)).collect()
}

pub(super) fn to_i64(digits: &[u16], negative: bool) -> Option<i64> {
    let magnitude = digits
        .iter()
        .rev()
        .try_fold(0u64, |acc, &d| acc.checked_mul(u64::from(BASE))?.checked_add(u64::from(d)))?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}
