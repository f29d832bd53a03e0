//! Car listing submitted for a fraud check

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body of `POST /api/check`
///
/// Every field is required. Categorical fields are free strings; the model
/// artifact decides how they are encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "make": "Volkswagen", "model": "Golf", "year": 2019, "reported_km": 92000,
    "fuelType": "Diesel", "gearbox": "Manual", "horsepower": 115,
    "price": 14500, "offerType": "Used"
}))]
pub struct CarListing {
    /// Car manufacturer
    #[schema(min_length = 1)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub make: String,

    /// Car model name
    #[schema(min_length = 1)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub model: String,

    /// Manufacturing year
    #[schema(minimum = 1900, maximum = 2100)]
    #[validate(range(min = 1900, max = 2100, message = "must be between 1900 and 2100"))]
    pub year: i32,

    /// Odometer reading in kilometers
    #[schema(minimum = 0)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub reported_km: i64,

    /// Type of fuel
    #[serde(rename = "fuelType")]
    #[schema(min_length = 1)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub fuel_type: String,

    /// Transmission type
    #[schema(min_length = 1)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub gearbox: String,

    /// Engine power in HP
    #[schema(minimum = 0)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub horsepower: i64,

    /// Listing price
    #[schema(minimum = 0)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,

    /// Offer type, e.g. "Used"
    #[serde(rename = "offerType")]
    #[schema(min_length = 1)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub offer_type: String,
}

#[cfg(test)]
pub(crate) fn sample_listing() -> CarListing {
    CarListing {
        make: "BMW".to_string(),
        model: "320".to_string(),
        year: 2012,
        reported_km: 15_000,
        fuel_type: "Diesel".to_string(),
        gearbox: "Automatic".to_string(),
        horsepower: 184,
        price: 9000.0,
        offer_type: "Used".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_names() {
        let listing: CarListing = serde_json::from_str(
            r#"{"make": "BMW", "model": "320", "year": 2012, "reported_km": 15000,
                "fuelType": "Diesel", "gearbox": "Automatic", "horsepower": 184,
                "price": 9000, "offerType": "Used"}"#,
        )
        .unwrap();

        assert_eq!(listing, sample_listing());
        assert!(listing.validate().is_ok());
    }

    #[test]
    fn test_missing_field_rejected() {
        let result: Result<CarListing, _> = serde_json::from_str(
            r#"{"make": "BMW", "model": "320", "year": 2012, "reported_km": 15000,
                "fuelType": "Diesel", "gearbox": "Automatic", "horsepower": 184,
                "price": 9000}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("offerType"));
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut listing = sample_listing();
        listing.reported_km = -1;
        listing.horsepower = -5;
        listing.price = -100.0;

        let errors = listing.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("reported_km"));
        assert!(fields.contains_key("horsepower"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_year_range() {
        let mut listing = sample_listing();
        listing.year = 1850;
        assert!(listing.validate().is_err());

        listing.year = 2100;
        assert!(listing.validate().is_ok());
    }

    #[test]
    fn test_empty_strings_rejected() {
        let mut listing = sample_listing();
        listing.make = String::new();
        listing.gearbox = String::new();

        let errors = listing.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_zero_values_allowed() {
        let mut listing = sample_listing();
        listing.reported_km = 0;
        listing.horsepower = 0;
        listing.price = 0.0;
        assert!(listing.validate().is_ok());
    }
}
