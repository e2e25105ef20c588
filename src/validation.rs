//! # Element value validation
//!
//! [`validate_value`] checks one element value, optionally against a companion
//! element (SMA against ECC, EquinoctialH against EquinoctialK, …), before a
//! host layer stores it in a state. Labels are the script names of the
//! elements. Element names that differ only by case (`Delaunayl` / `DelaunayL`)
//! are matched exactly; the classical names are matched case-insensitively.
//!
//! Labels without a constraint accept any real number.

use crate::constants::{EQUINOCTIAL_TOL, PARABOLIC_TOL, SINGULAR_TOL};
use crate::conversion_errors::ConversionError;

fn closed_range(label: &str, value: f64, low: f64, high: f64) -> Result<(), ConversionError> {
    if value < low || value > high {
        return Err(ConversionError::out_of_range(
            label,
            value,
            format!("{low:.1} <= Real Number <= {high:.1}"),
        ));
    }
    Ok(())
}

fn open_unit_range(label: &str, value: f64) -> Result<(), ConversionError> {
    if value < -1.0 + EQUINOCTIAL_TOL || value > 1.0 - EQUINOCTIAL_TOL {
        return Err(ConversionError::out_of_range(
            label,
            value,
            format!("-1 < Real Number < 1 (tolerance = {EQUINOCTIAL_TOL})"),
        ));
    }
    Ok(())
}

/// Check that `value` is admissible for the element `label`.
///
/// Arguments
/// ---------
/// * `label` – Script name of the element (`"ECC"`, `"RadPer"`, `"DelaunayG"`, …).
/// * `value` – Candidate value.
/// * `compare_to` – Script name of a companion element, or `""`.
/// * `compare_value` – Value of the companion element.
///
/// Errors
/// ------
/// * [`ConversionError::OutOfRange`] naming the element, the value and the
///   allowed range.
///
/// ```rust
/// use orbconv::validation::validate_value;
///
/// assert!(validate_value("ECC", 0.5, "SMA", 7000.0).is_ok());
/// assert!(validate_value("ECC", 1.5, "SMA", 7000.0).is_err());
/// assert!(validate_value("RAAN", -1234.0, "", 0.0).is_ok());
/// ```
pub fn validate_value(label: &str, value: f64, compare_to: &str, compare_value: f64) -> Result<(), ConversionError> {
    let upper = label.to_ascii_uppercase();
    let compare_upper = compare_to.to_ascii_uppercase();

    match (label, upper.as_str()) {
        (_, "RADAPO") => {
            if value.abs() < 1e-3 {
                return Err(ConversionError::out_of_range("RadApo", value, "Real Number >= 1 meter"));
            }
            if compare_upper == "RADPER" && value > 0.0 && value < compare_value {
                return Err(ConversionError::out_of_range(
                    "RadApo",
                    value,
                    "Real Number < 0.0 if RadApo < RadPer",
                ));
            }
        }
        (_, "RADPER") => {
            if value.abs() < 1e-3 {
                return Err(ConversionError::out_of_range("RadPer", value, "Real Number >= 1 meter"));
            }
        }
        (_, "ECC") => {
            if (value - 1.0).abs() <= PARABOLIC_TOL {
                return Err(ConversionError::out_of_range(
                    "ECC",
                    value,
                    format!("Real Number != 1 (tolerance = {PARABOLIC_TOL})"),
                ));
            }
            if compare_upper == "SMA" {
                let not_elliptic = value > 1.0 + PARABOLIC_TOL || value < -PARABOLIC_TOL;
                if not_elliptic && compare_value > 0.0 {
                    return Err(ConversionError::out_of_range("ECC", value, "0 < Real Number < 1 when SMA > 0"));
                }
                if value <= 1.0 - PARABOLIC_TOL && compare_value < 0.0 {
                    return Err(ConversionError::out_of_range("ECC", value, "Real Number > 1 when SMA < 0"));
                }
            }
        }
        ("BrouwerShortECC" | "BrouwerLongECC", _) => {
            if !(0.0..0.99).contains(&value) {
                return Err(ConversionError::out_of_range(label, value, "0 <= Real Number < 0.99"));
            }
        }
        (_, "SMA") => {
            if value.abs() <= SINGULAR_TOL {
                return Err(ConversionError::out_of_range(
                    "SMA",
                    value,
                    format!("Real Number != 0 (tolerance = {SINGULAR_TOL})"),
                ));
            }
            if compare_upper == "ECC" {
                let elliptic = compare_value > SINGULAR_TOL && compare_value < 1.0 - SINGULAR_TOL;
                if value < 0.0 && elliptic {
                    return Err(ConversionError::out_of_range("SMA", value, "Real Number > 0 when 0 < ECC < 1"));
                }
                if value > 0.0 && compare_value > 1.0 + SINGULAR_TOL {
                    return Err(ConversionError::out_of_range("SMA", value, "Real Number < 0 when ECC > 1"));
                }
            }
        }
        ("BrouwerShortSMA" | "BrouwerLongSMA", _) => {
            if compare_to.ends_with("ECC") && value < 1000.0 / (1.0 - compare_value) {
                return Err(ConversionError::out_of_range(
                    label,
                    value,
                    format!("Real Number >= 1000 / (1 - {compare_to})"),
                ));
            }
        }
        ("BrouwerShortINC" | "BrouwerLongINC", _) | (_, "INC" | "FPA") => {
            closed_range(label, value, 0.0, 180.0)?;
        }
        ("PlanetodeticRMAG" | "PlanetodeticVMAG", _) | (_, "RMAG" | "VMAG") => {
            if value < 1.0e-10 {
                return Err(ConversionError::out_of_range(label, value, "Real Number > 1.0e-10"));
            }
        }
        ("PlanetodeticHFPA" | "PlanetodeticLAT", _) | (_, "DEC" | "DECV") => {
            closed_range(label, value, -90.0, 90.0)?;
        }
        (_, "EQUINOCTIALK" | "EQUINOCTIALH") => {
            open_unit_range(label, value)?;
            let companion = if upper == "EQUINOCTIALK" {
                "EQUINOCTIALH"
            } else {
                "EQUINOCTIALK"
            };
            if compare_upper == companion && value.hypot(compare_value) > 1.0 - EQUINOCTIAL_TOL {
                return Err(ConversionError::out_of_range(
                    label,
                    value,
                    "Sqrt(EquinoctialH^2 + EquinoctialK^2) < 0.99999",
                ));
            }
        }
        (_, "MLONG") => closed_range(label, value, -360.0, 360.0)?,
        ("Delaunayl" | "Delaunayg" | "Delaunayh", _) | (_, "TLONG") => {
            closed_range(label, value, 0.0, 360.0)?;
        }
        (_, "SEMILATUSRECTUM") => {
            if value < 1.0e-7 {
                return Err(ConversionError::out_of_range(label, value, "1.0e-7 <= Real Number"));
            }
        }
        ("AltEquinoctialP" | "AltEquinoctialQ", _) => open_unit_range(label, value)?,
        ("DelaunayL", _) => {
            if value < 0.0 {
                return Err(ConversionError::out_of_range(label, value, "0 <= Real Number"));
            }
            if compare_to == "DelaunayG" && compare_value / value > 1.0 {
                return Err(ConversionError::out_of_range(label, value, "(DelaunayG / DelaunayL) <= 1"));
            }
        }
        ("DelaunayG", _) => {
            if value < 0.0 {
                return Err(ConversionError::out_of_range(label, value, "0 <= Real Number"));
            }
            if compare_to == "DelaunayH" && value.abs() < compare_value.abs() {
                return Err(ConversionError::out_of_range(label, value, "| DelaunayH | <= | DelaunayG |"));
            }
            if compare_to == "DelaunayL" && value / compare_value > 1.0 {
                return Err(ConversionError::out_of_range(label, value, "(DelaunayG / DelaunayL) <= 1"));
            }
        }
        ("DelaunayH", _) => {
            if compare_to == "DelaunayG" && value.abs() > compare_value.abs() {
                return Err(ConversionError::out_of_range(label, value, "| DelaunayH | <= | DelaunayG |"));
            }
        }
        _ => log::trace!("element {label} accepts any real number"),
    }
    Ok(())
}

#[cfg(test)]
mod validation_test {
    use super::*;

    #[test]
    fn test_sma_ecc_consistency() {
        assert!(validate_value("SMA", 7000.0, "ECC", 0.1).is_ok());
        assert!(validate_value("SMA", -7000.0, "ECC", 0.1).is_err());
        assert!(validate_value("SMA", 7000.0, "ECC", 1.5).is_err());
        assert!(validate_value("sma", 0.0, "", 0.0).is_err());
        assert!(validate_value("ECC", 1.0 + 1e-8, "", 0.0).is_err());
        assert!(validate_value("ECC", 0.5, "SMA", -7000.0).is_err());
    }

    #[test]
    fn test_apsides() {
        assert!(validate_value("RadApo", 0.0, "", 0.0).is_err());
        assert!(validate_value("RadApo", 6000.0, "RadPer", 7000.0).is_err());
        assert!(validate_value("RadApo", -60000.0, "RadPer", 7000.0).is_ok());
        assert!(validate_value("RadPer", 1e-4, "", 0.0).is_err());
    }

    #[test]
    fn test_case_sensitive_delaunay_labels() {
        assert!(validate_value("Delaunayl", 400.0, "", 0.0).is_err());
        // DelaunayL is an action, not an angle
        assert!(validate_value("DelaunayL", 400.0, "", 0.0).is_ok());
        assert!(validate_value("DelaunayH", -90.0, "DelaunayG", 80.0).is_err());
        assert!(validate_value("DelaunayG", 90.0, "DelaunayL", 80.0).is_err());
    }

    #[test]
    fn test_ranges() {
        assert!(validate_value("INC", 180.0, "", 0.0).is_ok());
        assert!(validate_value("BrouwerLongINC", 180.5, "", 0.0).is_err());
        assert!(validate_value("PlanetodeticLAT", -90.5, "", 0.0).is_err());
        assert!(validate_value("BrouwerShortECC", 0.99, "", 0.0).is_err());
        assert!(validate_value("BrouwerShortSMA", 2000.0, "BrouwerShortECC", 0.5).is_ok());
        assert!(validate_value("BrouwerShortSMA", 2000.0, "BrouwerShortECC", 0.7).is_err());
        assert!(validate_value("EquinoctialH", 0.8, "EquinoctialK", 0.7).is_err());
        assert!(validate_value("AltEquinoctialQ", 1.0, "", 0.0).is_err());
        assert!(validate_value("SemilatusRectum", 0.0, "", 0.0).is_err());
        assert!(matches!(
            validate_value("MLONG", 400.0, "", 0.0),
            Err(ConversionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unconstrained_labels() {
        for label in ["X", "VZ", "RAAN", "AOP", "TA", "EquinoctialP", "Unknown"] {
            assert!(validate_value(label, -1.0e6, "", 0.0).is_ok(), "{label}");
        }
    }
}
