//! Unit conversions for raw combine measurements.
//!
//! Every conversion is total: a missing or malformed input yields `None`,
//! never an error.

const CM_PER_INCH: f64 = 2.54;
const M_PER_INCH: f64 = 0.0254;
const KG_PER_POUND: f64 = 0.453592;

/// Convert a `<feet>-<inches>` height token (e.g. `"6-2"`) to centimeters.
pub fn height_to_cm(token: Option<&str>) -> Option<f64> {
    let (feet, inches) = token?.trim().split_once('-')?;
    let feet = feet.trim().parse::<u32>().ok()?;
    let inches = inches.trim().parse::<u32>().ok()?;
    let total_inches = (feet as f64) * 12.0 + (inches as f64);
    Some(round2(total_inches * CM_PER_INCH))
}

pub fn pounds_to_kg(weight: Option<f64>) -> Option<f64> {
    scale(weight, KG_PER_POUND)
}

pub fn inches_to_m(value: Option<f64>) -> Option<f64> {
    scale(value, M_PER_INCH)
}

pub fn inches_to_cm(value: Option<f64>) -> Option<f64> {
    scale(value, CM_PER_INCH)
}

fn scale(value: Option<f64>, factor: f64) -> Option<f64> {
    let v = value.filter(|v| v.is_finite())?;
    Some(round2(v * factor))
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
