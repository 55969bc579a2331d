//! Conceptual-DFT reactivity descriptors from vertical IP and EA (eV).
//!
//! The electrophilic descriptors divide by the chemical hardness `IP − EA`
//! and are only defined while it is positive.

use super::Error;

/// `8 (IP − EA)`, rejecting a non-positive or non-finite gap.
fn hardness_denominator(ip: f64, ea: f64) -> Result<f64, Error> {
    let gap = ip - ea;
    if gap > 0.0 && gap.is_finite() {
        Ok(8.0 * gap)
    } else {
        Err(Error::NonPositiveGap { ip, ea })
    }
}

/// Global electrophilicity index `ω = (IP + EA)² / (8 (IP − EA))`.
///
/// # Errors
///
/// Returns [`Error::NonPositiveGap`] unless `IP > EA`.
pub fn electrophilicity(ip: f64, ea: f64) -> Result<f64, Error> {
    Ok((ip + ea).powi(2) / hardness_denominator(ip, ea)?)
}

/// Nucleophilicity `−IP`.
pub fn nucleophilicity(ip: f64) -> f64 {
    -ip
}

/// Electrofugality `(3 IP − EA)² / (8 (IP − EA))`.
///
/// # Errors
///
/// Returns [`Error::NonPositiveGap`] unless `IP > EA`.
pub fn electrofugality(ip: f64, ea: f64) -> Result<f64, Error> {
    Ok((3.0 * ip - ea).powi(2) / hardness_denominator(ip, ea)?)
}

/// Nucleofugality `(IP − 3 EA)² / (8 (IP − EA))`.
///
/// # Errors
///
/// Returns [`Error::NonPositiveGap`] unless `IP > EA`.
pub fn nucleofugality(ip: f64, ea: f64) -> Result<f64, Error> {
    Ok((ip - 3.0 * ea).powi(2) / hardness_denominator(ip, ea)?)
}

/// Local electrophilicity `f⁺ · ω` per atom.
///
/// # Errors
///
/// Returns [`Error::NonPositiveGap`] unless `IP > EA`.
pub fn atomic_electrophilicity(fukui_plus: &[f64], ip: f64, ea: f64) -> Result<Vec<f64>, Error> {
    let omega = electrophilicity(ip, ea)?;
    Ok(fukui_plus.iter().map(|f| f * omega).collect())
}

/// Local nucleophilicity `f⁻ · (−IP)` per atom.
pub fn atomic_nucleophilicity(fukui_minus: &[f64], ip: f64) -> Vec<f64> {
    let nu = nucleophilicity(ip);
    fukui_minus.iter().map(|f| f * nu).collect()
}
