use crate::domain::model::RawInputs;
use crate::utils::error::{PricingError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(
    field_name: &str,
    value: usize,
    min_value: usize,
    max_value: usize,
) -> Result<()> {
    if value < min_value || value > max_value {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min_value, max_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Input-side check used for form fields. NaN never passes.
pub fn validate_min(field_name: &str, value: f64, min: f64) -> Result<()> {
    if value.is_nan() || value < min {
        return Err(PricingError::InvalidInputError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written so that NaN falls through to the error branch
    if !(value >= min && value <= max) {
        return Err(PricingError::InvalidInputError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub const MIN_WEIGHT_GRAMS: f64 = 1.0;
/// Bar chart width in cells.
pub const CHART_WIDTH_RANGE: (usize, usize) = (10, 200);
pub const REVIEW_SCORE_RANGE: (f64, f64) = (1.0, 5.0);
pub const YEAR_RANGE: (u32, u32) = (2015, 2025);

/// The same bounds the pricing form puts on its inputs; nothing stricter.
impl Validate for RawInputs {
    fn validate(&self) -> Result<()> {
        validate_min("shipping_cost", self.shipping_cost, 0.0)?;
        validate_min("weight", self.weight_grams, MIN_WEIGHT_GRAMS)?;
        validate_range(
            "review_score",
            self.review_score,
            REVIEW_SCORE_RANGE.0,
            REVIEW_SCORE_RANGE.1,
        )?;
        validate_min("competitor_price", self.competitor_price, 0.0)?;
        validate_range("month", self.month, 1, 12)?;
        validate_range("year", self.year, YEAR_RANGE.0, YEAR_RANGE.1)?;
        validate_min("current_price", self.current_price, 0.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults_are_valid() {
        assert!(RawInputs::default().validate().is_ok());
    }

    #[test]
    fn test_raw_input_bounds() {
        let base = RawInputs::default();

        let zero_costs = RawInputs {
            shipping_cost: 0.0,
            competitor_price: 0.0,
            current_price: 0.0,
            ..base.clone()
        };
        assert!(zero_costs.validate().is_ok());

        for bad in [
            RawInputs { weight_grams: 0.5, ..base.clone() },
            RawInputs { review_score: 5.1, ..base.clone() },
            RawInputs { month: 0, ..base.clone() },
            RawInputs { year: 2026, ..base.clone() },
            RawInputs { competitor_price: -1.0, ..base.clone() },
        ] {
            let err = bad.validate().unwrap_err();
            assert!(matches!(err, PricingError::InvalidInputError { .. }), "{:?}", bad);
        }
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("model.path", "pricing_model.json").is_ok());
        assert!(validate_path("model.path", "").is_err());
        assert!(validate_path("model.path", "   ").is_err());
        assert!(validate_path("model.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("display.chart_width", 40, 10, 200).is_ok());
        assert!(validate_positive_number("display.chart_width", 200, 10, 200).is_ok());
        assert!(validate_positive_number("display.chart_width", 5, 10, 200).is_err());
        assert!(validate_positive_number("display.chart_width", usize::MAX, 10, 200).is_err());
    }

    #[test]
    fn test_validate_min_rejects_nan() {
        assert!(validate_min("shipping_cost", 0.0, 0.0).is_ok());
        assert!(validate_min("shipping_cost", -0.5, 0.0).is_err());
        assert!(validate_min("shipping_cost", f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("month", 1, 1, 12).is_ok());
        assert!(validate_range("month", 12, 1, 12).is_ok());
        assert!(validate_range("month", 13, 1, 12).is_err());
        assert!(validate_range("review_score", f64::NAN, 1.0, 5.0).is_err());
    }
}
