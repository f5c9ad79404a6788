use crate::models::{EnergyLevel, Intensity};

pub const HIGH_INTENSITY_HR_BPM: f64 = 150.0;
pub const LOW_INTENSITY_HR_BPM: f64 = 120.0;

pub const HIGH_ENERGY_HRV_MS: f64 = 60.0;
pub const LOW_ENERGY_HRV_MS: f64 = 30.0;

/// Bucket an average heart rate. Both breakpoints are exclusive, so 150 and
/// 120 are moderate.
pub fn intensity_from_hr(avg_hr_bpm: f64) -> Intensity {
    if avg_hr_bpm > HIGH_INTENSITY_HR_BPM {
        Intensity::High
    } else if avg_hr_bpm < LOW_INTENSITY_HR_BPM {
        Intensity::Low
    } else {
        Intensity::Moderate
    }
}

/// Bucket heart rate variability (RMSSD, milliseconds) into an energy level.
pub fn energy_from_hrv(hrv_rmssd_ms: f64) -> EnergyLevel {
    if hrv_rmssd_ms > HIGH_ENERGY_HRV_MS {
        EnergyLevel::High
    } else if hrv_rmssd_ms < LOW_ENERGY_HRV_MS {
        EnergyLevel::Low
    } else {
        EnergyLevel::Average
    }
}
