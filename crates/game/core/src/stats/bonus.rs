//! Bonus application following a fixed stack order.
//!
//! Every player stat goes through the same calculation:
//! `Flat (summed) → Multiplier (product) → Clamp`
//!
//! Additive deltas always land before multiplicative factors, regardless of
//! the order in which items contributed them.

/// A single bonus that can be applied to a stat value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bonus {
    /// Flat additive bonus (applied first, summed).
    Flat(f64),

    /// Multiplicative factor (applied after all flat bonuses, multiplied).
    /// `1.1` means ×1.1.
    Multiplier(f64),
}

/// A collection of bonuses applied in the correct order.
///
/// # Example
/// ```
/// # use rogue_core::stats::bonus::{Bonus, BonusStack, StatBounds};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(5.0));
/// stack.add(Bonus::Multiplier(1.5));
/// stack.add(Bonus::Flat(5.0));
///
/// // (10 + 5 + 5) × 1.5
/// assert_eq!(stack.apply(10.0, StatBounds::UNCLAMPED), 30.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BonusStack {
    flat: f64,
    multiplier: f64,
    len: usize,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            flat: 0.0,
            multiplier: 1.0,
            len: 0,
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        match bonus {
            Bonus::Flat(value) => self.flat += value,
            Bonus::Multiplier(factor) => self.multiplier *= factor,
        }
        self.len += 1;
    }

    /// Sum of all flat bonuses.
    pub fn flat(&self) -> f64 {
        self.flat
    }

    /// Product of all multipliers.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Apply all bonuses to a base value and clamp to `bounds`.
    ///
    /// # Formula
    /// ```text
    /// result = clamp((base + flat_sum) × multiplier_product)
    /// ```
    pub fn apply(&self, base: f64, bounds: StatBounds) -> f64 {
        bounds.clamp((base + self.flat) * self.multiplier)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl Default for BonusStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Valid domain of one stat.
///
/// Integer stats are floored before the lower bound is enforced so that a
/// stat can never round below its minimum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatBounds {
    pub min: f64,
    pub max: f64,
    pub integer: bool,
}

impl StatBounds {
    /// Probabilities in `[0, 1]`.
    pub const PROBABILITY: Self = Self::fraction(1.0);

    /// Non-negative integers.
    pub const COUNT: Self = Self::integer(0.0);

    /// Integers of at least one.
    pub const POSITIVE_COUNT: Self = Self::integer(1.0);

    /// No bounds (unclamped).
    pub const UNCLAMPED: Self = Self {
        min: f64::MIN,
        max: f64::MAX,
        integer: false,
    };

    /// Upper bound for integer stats, well inside `u32`.
    const INTEGER_MAX: f64 = 1_000_000_000.0;

    /// Fractional stat in `[0, max]`.
    pub const fn fraction(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            integer: false,
        }
    }

    /// Integer stat in `[min, INTEGER_MAX]`.
    pub const fn integer(min: f64) -> Self {
        Self {
            min,
            max: Self::INTEGER_MAX,
            integer: true,
        }
    }

    /// Fractional stat with only a lower bound.
    pub const fn at_least(min: f64) -> Self {
        Self {
            min,
            max: f64::MAX,
            integer: false,
        }
    }

    /// Clamp a value into this domain. NaN collapses to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let value = if self.integer { value.floor() } else { value };
        value.clamp(self.min, self.max)
    }
}
