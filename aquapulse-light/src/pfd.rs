use crate::round_to;
use crate::spectrum::{Spectrum, SpectrumError};

/// Calibration factor converting a 1 nm-step `nm * si` sum to photon flux
/// density in umol/m^2/s, from the spectrometer vendor's sheet.
pub const DEFAULT_FACTOR: f64 = 8.36e-6;

/// The factor above is only valid on a 1 nm wavelength grid.
const STEP_TOLERANCE: f64 = 1e-5;

/// Banded photon flux density totals over a measured spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct PfdReport {
    pub total: f64,
    pub par: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub far_red: f64,
    pub step: f64,
    pub min_nm: f64,
    pub max_nm: f64,
}

impl PfdReport {
    pub fn compute(spectrum: &Spectrum, factor: f64) -> Result<Self, SpectrumError> {
        let step = spectrum.step();
        if (step - 1.0).abs() > STEP_TOLERANCE {
            return Err(SpectrumError::NonUniformStep { found: step });
        }

        let min_nm = spectrum.min_nm();
        let max_nm = spectrum.max_nm();
        let band = |lo: f64, hi: f64| round_to(factor * spectrum.band_sum(lo, hi), 3);

        Ok(Self {
            total: band(min_nm, max_nm),
            par: band(400.0, 700.0),
            red: band(600.0, 699.0),
            green: band(500.0, 599.0),
            blue: band(400.0, 499.0),
            far_red: band(700.0, 799.0),
            step,
            min_nm,
            max_nm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat spectrum, si = 1 for every nm in 400..=700.
    fn flat_par_spectrum() -> Spectrum {
        let wavelengths: Vec<f64> = (400..=700).map(|nm| nm as f64).collect();
        let intensities = vec![1.0; wavelengths.len()];
        Spectrum::new(wavelengths, intensities).unwrap()
    }

    #[test]
    fn banded_sums_match_hand_computation() {
        // Sum of nm over [a, b] is (a + b)(b - a + 1) / 2; with factor 1e-3:
        //   blue  400..=499 -> 44950 -> 44.95
        //   green 500..=599 -> 54950 -> 54.95
        //   red   600..=699 -> 64950 -> 64.95
        //   far red: only nm = 700 -> 0.7
        //   total/par 400..=700 -> 165550 -> 165.55
        let report = PfdReport::compute(&flat_par_spectrum(), 1e-3).unwrap();

        assert_eq!(report.blue, 44.95);
        assert_eq!(report.green, 54.95);
        assert_eq!(report.red, 64.95);
        assert_eq!(report.far_red, 0.7);
        assert_eq!(report.total, 165.55);
        assert_eq!(report.par, report.total);
        assert_eq!(report.min_nm, 400.0);
        assert_eq!(report.max_nm, 700.0);
    }

    #[test]
    fn small_fixture_with_vendor_factor() {
        let spectrum = Spectrum::new(vec![500.0, 501.0, 502.0], vec![1.0, 1.0, 1.0]).unwrap();
        let report = PfdReport::compute(&spectrum, DEFAULT_FACTOR).unwrap();

        // 1503 * 8.36e-6 = 0.01256... -> 0.013
        assert_eq!(report.total, 0.013);
        assert_eq!(report.green, 0.013);
        assert_eq!(report.red, 0.0);
    }

    #[test]
    fn rejects_two_nm_grid() {
        let spectrum = Spectrum::new(vec![400.0, 402.0, 404.0], vec![1.0, 1.0, 1.0]).unwrap();

        assert_eq!(
            PfdReport::compute(&spectrum, DEFAULT_FACTOR).unwrap_err(),
            SpectrumError::NonUniformStep { found: 2.0 }
        );
    }
}
