//! Fare Calculator
//!
//! `fare = base[class] + round_half_up(per_km[class] * distance_km)`.
//! Uses rust_decimal for the multiplication so the half-up rounding is exact,
//! stores the result as whole currency units.

use rust_decimal::prelude::*;
use shared::ride::VehicleClass;
use thiserror::Error;

/// Fare calculation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FareError {
    #[error("distanceKm must be a finite non-negative number, got {0}")]
    InvalidDistance(f64),

    #[error("fare for distance {0} km exceeds the representable range")]
    Overflow(f64),
}

/// Base fare and per-km rate for one vehicle class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareRate {
    pub base: u64,
    pub per_km: Decimal,
}

impl FareRate {
    pub fn new(base: u64, per_km: impl Into<Decimal>) -> Self {
        Self {
            base,
            per_km: per_km.into(),
        }
    }
}

/// Rate table for every vehicle class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareTable {
    pub economy: FareRate,
    pub auto: FareRate,
    pub premium: FareRate,
}

impl FareTable {
    pub fn rate_for(&self, class: VehicleClass) -> FareRate {
        match class {
            VehicleClass::Economy => self.economy,
            VehicleClass::Auto => self.auto,
            VehicleClass::Premium => self.premium,
        }
    }

    pub fn set_rate(&mut self, class: VehicleClass, rate: FareRate) {
        match class {
            VehicleClass::Economy => self.economy = rate,
            VehicleClass::Auto => self.auto = rate,
            VehicleClass::Premium => self.premium = rate,
        }
    }
}

impl Default for FareTable {
    fn default() -> Self {
        Self {
            economy: FareRate::new(20, 10),
            auto: FareRate::new(30, 15),
            premium: FareRate::new(50, 25),
        }
    }
}

/// Pure fare calculator, shareable across threads without coordination
#[derive(Debug, Clone, Default)]
pub struct FareCalculator {
    table: FareTable,
}

impl FareCalculator {
    pub fn new(table: FareTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &FareTable {
        &self.table
    }

    /// Compute the fare for a known vehicle class
    pub fn estimate(&self, class: VehicleClass, distance_km: f64) -> Result<u64, FareError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(FareError::InvalidDistance(distance_km));
        }
        let distance =
            Decimal::from_f64(distance_km).ok_or(FareError::Overflow(distance_km))?;

        let rate = self.table.rate_for(class);
        let variable = rate
            .per_km
            .checked_mul(distance)
            .ok_or(FareError::Overflow(distance_km))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(FareError::Overflow(distance_km))?;

        rate.base
            .checked_add(variable)
            .ok_or(FareError::Overflow(distance_km))
    }

    /// Compute the fare from a client-supplied class name
    ///
    /// Unknown names are priced as economy.
    pub fn estimate_by_name(&self, class_name: &str, distance_km: f64) -> Result<u64, FareError> {
        self.estimate(VehicleClass::parse_lenient(class_name), distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_is_base_fare() {
        let calc = FareCalculator::default();
        assert_eq!(calc.estimate(VehicleClass::Economy, 0.0), Ok(20));
        assert_eq!(calc.estimate(VehicleClass::Auto, 0.0), Ok(30));
        assert_eq!(calc.estimate(VehicleClass::Premium, 0.0), Ok(50));
    }

    #[test]
    fn test_auto_five_km() {
        let calc = FareCalculator::default();
        assert_eq!(calc.estimate(VehicleClass::Auto, 5.0), Ok(105));
    }

    #[test]
    fn test_round_half_up() {
        let calc = FareCalculator::default();
        // 15 * 0.1 = 1.5 -> 2
        assert_eq!(calc.estimate(VehicleClass::Auto, 0.1), Ok(32));
        // 10 * 0.14 = 1.4 -> 1
        assert_eq!(calc.estimate(VehicleClass::Economy, 0.14), Ok(21));
        // 25 * 0.5 = 12.5 -> 13
        assert_eq!(calc.estimate(VehicleClass::Premium, 0.5), Ok(63));
    }

    #[test]
    fn test_deterministic() {
        let calc = FareCalculator::default();
        for class in VehicleClass::ALL {
            for d in [0.0, 0.3, 1.0, 7.77, 42.5, 1234.5] {
                assert_eq!(calc.estimate(class, d), calc.estimate(class, d));
            }
        }
    }

    #[test]
    fn test_invalid_distance() {
        let calc = FareCalculator::default();
        assert_eq!(
            calc.estimate(VehicleClass::Auto, -0.5),
            Err(FareError::InvalidDistance(-0.5))
        );
        assert!(calc.estimate(VehicleClass::Auto, f64::NAN).is_err());
        assert!(calc.estimate(VehicleClass::Auto, f64::INFINITY).is_err());
    }

    #[test]
    fn test_huge_distance_overflows_cleanly() {
        let calc = FareCalculator::default();
        assert!(matches!(
            calc.estimate(VehicleClass::Premium, 1e30),
            Err(FareError::Overflow(_))
        ));
    }

    #[test]
    fn test_unknown_class_priced_as_economy() {
        let calc = FareCalculator::default();
        assert_eq!(
            calc.estimate_by_name("spaceship", 3.0),
            calc.estimate(VehicleClass::Economy, 3.0)
        );
        assert_eq!(calc.estimate_by_name("", 3.0), Ok(50));
    }

    #[test]
    fn test_custom_table() {
        let mut table = FareTable::default();
        table.set_rate(VehicleClass::Auto, FareRate::new(0, Decimal::new(125, 1)));
        let calc = FareCalculator::new(table);
        // 12.5 * 3 = 37.5 -> 38
        assert_eq!(calc.estimate(VehicleClass::Auto, 3.0), Ok(38));
    }
}
