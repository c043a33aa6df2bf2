//! Gaussian spectral power distribution model for the LED mix, used to
//! estimate PPFD for a planned build before anything is soldered.

/// Planck's constant, J s.
pub const PLANCK: f64 = 6.626e-34;

/// Speed of light, m/s.
pub const LIGHT_SPEED: f64 = 3.00e8;

/// Photon-count to umol conversion used by the estimate.
const UMOL_CONVERSION: f64 = 4.57e-6;

/// Every emitter is modelled as Gaussian peaks with this width.
const SIGMA_NM: f64 = 10.0;

/// Modelled wavelength range and sample count.
pub const RANGE_NM: (f64, f64) = (380.0, 780.0);
pub const SAMPLES: usize = 400;

#[derive(Debug, Clone, Copy)]
pub struct Peak {
    pub center_nm: f64,
    pub weight: f64,
}

/// One LED type: a weighted sum of Gaussian peaks, counted `multiplicity`
/// times in the fixture.
#[derive(Debug, Clone)]
pub struct SpdChannel {
    pub peaks: Vec<Peak>,
    pub multiplicity: f64,
}

impl SpdChannel {
    /// Single-peak emitter (deep red, royal blue, warm white).
    pub fn single(center_nm: f64, multiplicity: f64) -> Self {
        Self {
            peaks: vec![Peak {
                center_nm,
                weight: 1.0,
            }],
            multiplicity,
        }
    }

    /// Two-peak emitter (phosphor whites: blue pump plus phosphor hump).
    pub fn dual(first_nm: f64, second_nm: f64, multiplicity: f64) -> Self {
        Self {
            peaks: vec![
                Peak {
                    center_nm: first_nm,
                    weight: 0.5,
                },
                Peak {
                    center_nm: second_nm,
                    weight: 0.5,
                },
            ],
            multiplicity,
        }
    }

    fn emission(&self, nm: f64) -> f64 {
        let shape: f64 = self
            .peaks
            .iter()
            .map(|peak| peak.weight * (-((nm - peak.center_nm) / SIGMA_NM).powi(2)).exp())
            .sum();
        shape * self.multiplicity
    }
}

/// The planned mix: deep red 660, two royal blues 450, cool white
/// (450 + 550), warm white 600.
pub fn default_channels() -> Vec<SpdChannel> {
    vec![
        SpdChannel::single(660.0, 1.0),
        SpdChannel::single(450.0, 2.0),
        SpdChannel::dual(450.0, 550.0, 1.0),
        SpdChannel::single(600.0, 1.0),
    ]
}

/// Evenly spaced wavelength grid over [`RANGE_NM`], endpoints included.
pub fn lambda_grid() -> Vec<f64> {
    (0..SAMPLES)
        .map(|i| {
            RANGE_NM.0 + (RANGE_NM.1 - RANGE_NM.0) * i as f64 / (SAMPLES as f64 - 1.0)
        })
        .collect()
}

/// Combined SPD of all channels over the grid, normalized to unit sum.
pub fn combined_spd(channels: &[SpdChannel], grid: &[f64]) -> Vec<f64> {
    let mut spd: Vec<f64> = grid
        .iter()
        .map(|&nm| channels.iter().map(|channel| channel.emission(nm)).sum())
        .collect();

    let total: f64 = spd.iter().sum();
    if total > 0.0 {
        for value in &mut spd {
            *value /= total;
        }
    }

    spd
}

/// Photon-flux estimate over the 400-700 nm PAR window of a normalized SPD.
/// Each sample contributes its photon energy `lambda / (h c)` weighted by the
/// normalized power at that wavelength.
pub fn ppfd_estimate(grid: &[f64], normalized_spd: &[f64]) -> f64 {
    let photon_sum: f64 = grid
        .iter()
        .zip(normalized_spd)
        .filter(|(nm, _)| (400.0..=700.0).contains(*nm))
        .map(|(&nm, &power)| power * (nm * 1e-9) / (PLANCK * LIGHT_SPEED))
        .sum();

    photon_sum * (1.0 / UMOL_CONVERSION) * (SAMPLES as f64 / grid.len() as f64)
}
