// RosterSleuth - app/validate.rs
//
// Caller-side range checks. The manager stores any CGPA it is given; front
// ends validate user input here before handing it over.

use crate::util::constants::MIN_CGPA;
use crate::util::error::RecordError;

/// Accept a CGPA in `0..=max_cgpa`.
pub fn check_cgpa(value: f64, max_cgpa: f64) -> Result<f64, RecordError> {
    check_range("cgpa", value, MIN_CGPA, max_cgpa)
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, RecordError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(RecordError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
