//! Feature rows fed to the two models
//!
//! Names and order match the training pipeline. The artifacts are checked
//! against these lists at load time.

use crate::gbdt::FeatureValue;
use crate::models::CarListing;

pub const REGRESSOR_FEATURES: [&str; 10] = [
    "year",
    "price",
    "horsepower",
    "make",
    "model",
    "fuelType",
    "gearbox",
    "offerType",
    "age",
    "age_squared",
];

pub const CLASSIFIER_FEATURES: [&str; 4] = ["smart_ratio", "age", "market_km_diff", "log_diff"];

/// Age in years, never below one
pub fn car_age(year: i32, current_year: i32) -> i64 {
    (i64::from(current_year) - i64::from(year)).max(1)
}

/// Input of the mileage regressor
#[derive(Debug, Clone, PartialEq)]
pub struct RegressorRow<'a> {
    pub year: i32,
    pub price: f64,
    pub horsepower: i64,
    pub make: &'a str,
    pub model: &'a str,
    pub fuel_type: &'a str,
    pub gearbox: &'a str,
    pub offer_type: &'a str,
    pub age: i64,
    pub age_squared: i64,
}

impl<'a> RegressorRow<'a> {
    pub fn from_listing(listing: &'a CarListing, current_year: i32) -> Self {
        let age = car_age(listing.year, current_year);
        Self {
            year: listing.year,
            price: listing.price,
            horsepower: listing.horsepower,
            make: &listing.make,
            model: &listing.model,
            fuel_type: &listing.fuel_type,
            gearbox: &listing.gearbox,
            offer_type: &listing.offer_type,
            age,
            age_squared: age * age,
        }
    }

    /// Cells in [`REGRESSOR_FEATURES`] order
    pub fn values(&self) -> [FeatureValue<'a>; 10] {
        [
            FeatureValue::Num(f64::from(self.year)),
            FeatureValue::Num(self.price),
            FeatureValue::Num(self.horsepower as f64),
            FeatureValue::Cat(self.make),
            FeatureValue::Cat(self.model),
            FeatureValue::Cat(self.fuel_type),
            FeatureValue::Cat(self.gearbox),
            FeatureValue::Cat(self.offer_type),
            FeatureValue::Num(self.age as f64),
            FeatureValue::Num(self.age_squared as f64),
        ]
    }
}

/// How the reported mileage compares to the expected one
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierRow {
    /// reported_km / max(1, expected_km)
    pub smart_ratio: f64,
    pub age: i64,
    /// reported_km - expected_km
    pub market_km_diff: i64,
    /// ln(1 + reported_km) - predicted log mileage
    pub log_diff: f64,
}

impl ClassifierRow {
    pub fn new(reported_km: i64, expected_km: i64, predicted_log: f64, age: i64) -> Self {
        Self {
            smart_ratio: reported_km as f64 / expected_km.max(1) as f64,
            age,
            market_km_diff: reported_km - expected_km,
            log_diff: (reported_km as f64).ln_1p() - predicted_log,
        }
    }

    /// Cells in [`CLASSIFIER_FEATURES`] order
    pub fn values(&self) -> [FeatureValue<'static>; 4] {
        [
            FeatureValue::Num(self.smart_ratio),
            FeatureValue::Num(self.age as f64),
            FeatureValue::Num(self.market_km_diff as f64),
            FeatureValue::Num(self.log_diff),
        ]
    }
}
