/// Alert counts generated by a defended group, indexed by group size.
const ALERTS_BY_GROUP_SIZE: [i64; 7] = [0, 0, 1, 2, 4, 7, 11];

pub fn triangular(n: i64) -> i64 {
    n * (n + 1) / 2
}

/// Bonus dice earned from the alert counter: `floor(-0.5 + sqrt(0.25 + 2 * alerts))`.
///
/// The float estimate is corrected against the exact integer bound so the
/// result is the floor of the true root for every input, not just small ones.
pub fn alert_bonus(alerts: i64) -> i64 {
    if alerts <= 0 {
        return 0;
    }
    let mut bonus = ((0.25 + 2.0 * alerts as f64).sqrt() - 0.5).floor() as i64;
    let target = i128::from(alerts);
    while bonus > 0 && triangular_wide(bonus) > target {
        bonus -= 1;
    }
    while triangular_wide(bonus + 1) <= target {
        bonus += 1;
    }
    bonus
}

fn triangular_wide(n: i64) -> i128 {
    let n = i128::from(n);
    n * (n + 1) / 2
}

pub fn alerts_generated(group_size: usize) -> i64 {
    match ALERTS_BY_GROUP_SIZE.get(group_size) {
        Some(alerts) => *alerts,
        None => triangular(group_size as i64) - 10,
    }
}

/// Cost of raising a boost from `previous` to `previous + increment`.
/// Wide enough for any pair of `u32` inputs.
pub fn boost_cost(previous: u32, increment: u32) -> u128 {
    let previous = u128::from(previous);
    let increment = u128::from(increment);
    increment * (2 * previous + increment + 1) / 2
}

pub fn depth_bonus(cursor: usize) -> i64 {
    (cursor / 2) as i64
}

pub fn total_strength_bonus(alerts: i64, card_boost: u32, cursor: usize) -> i64 {
    alert_bonus(alerts) + i64::from(card_boost) + depth_bonus(cursor)
}
