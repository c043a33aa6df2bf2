use std::f64::consts::PI;

use crate::round_to;

/// Photon flux of a fixture, in umol/s: electrical power times the driver's
/// rated photon efficacy.
pub fn fixture_ppf(power_w: f64, efficacy_umol_per_j: f64) -> f64 {
    power_w * efficacy_umol_per_j
}

/// Photon flux density over a circular beam footprint, in umol/m^2/s.
pub fn ppfd(ppf: f64, beam_radius_m: f64) -> f64 {
    let area = PI * beam_radius_m * beam_radius_m;
    round_to(ppf / area, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifteen_watt_panel() {
        // 15 W at 2 umol/J over a 7.5 cm radius footprint.
        let ppf = fixture_ppf(15.0, 2.0);
        assert_eq!(ppf, 30.0);
        assert_eq!(ppfd(ppf, 0.075), 1697.65);
    }

    #[test]
    fn quadruple_area_quarters_flux_density() {
        let near = ppfd(30.0, 0.075);
        let far = ppfd(30.0, 0.15);

        assert!((near / far - 4.0).abs() < 0.01);
    }
}
