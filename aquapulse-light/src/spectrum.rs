use std::path::Path;

use csv::Reader;

/// A measured spectral power distribution: per-wavelength intensity read
/// from a spectrometer export with `nm` and `si` columns.
#[derive(Debug, Clone)]
pub struct Spectrum {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl Spectrum {
    pub fn new(wavelengths: Vec<f64>, intensities: Vec<f64>) -> Result<Self, SpectrumError> {
        if wavelengths.len() != intensities.len() {
            Err(SpectrumError::ColumnSizeMismatch)?
        }
        if wavelengths.len() < 2 {
            Err(SpectrumError::TooFewRows)?
        }

        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let mut rdr = Reader::from_path(path).map_err(|e| SpectrumError::CsvError(e.to_string()))?;

        let headers = rdr
            .headers()
            .map_err(|e| SpectrumError::CsvError(e.to_string()))?;
        let nm_index = headers
            .iter()
            .position(|h| h == "nm")
            .ok_or(SpectrumError::MissingColumn("nm"))?;
        let si_index = headers
            .iter()
            .position(|h| h == "si")
            .ok_or(SpectrumError::MissingColumn("si"))?;

        let mut wavelengths = Vec::new();
        let mut intensities = Vec::new();

        // Only the two named columns are parsed; exports often carry extra
        // metadata columns.
        for result in rdr.records() {
            let row = result.map_err(|e| SpectrumError::CsvError(e.to_string()))?;
            wavelengths.push(Self::parse_field(&row, nm_index, "nm")?);
            intensities.push(Self::parse_field(&row, si_index, "si")?);
        }

        Self::new(wavelengths, intensities)
    }

    fn parse_field(
        row: &csv::StringRecord,
        index: usize,
        name: &'static str,
    ) -> Result<f64, SpectrumError> {
        row.get(index)
            .ok_or(SpectrumError::MissingColumn(name))?
            .trim()
            .parse()
            .map_err(|e| SpectrumError::CsvError(format!("bad `{name}` value: {e}")))
    }

    /// Mean successive wavelength difference in nm.
    pub fn step(&self) -> f64 {
        let diffs = self.wavelengths.len() - 1;
        self.wavelengths
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .sum::<f64>()
            / diffs as f64
    }

    pub fn min_nm(&self) -> f64 {
        self.wavelengths.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_nm(&self) -> f64 {
        self.wavelengths
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Sum of `nm * si` over rows with `lo <= nm <= hi`. Band edges are
    /// inclusive on both sides, matching the calibration sheet.
    pub fn band_sum(&self, lo: f64, hi: f64) -> f64 {
        self.wavelengths
            .iter()
            .zip(&self.intensities)
            .filter(|&(&nm, _)| nm >= lo && nm <= hi)
            .map(|(&nm, &si)| nm * si)
            .sum()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("Spectrum must have at least two rows")]
    TooFewRows,

    #[error("Wavelength and intensity columns have different lengths")]
    ColumnSizeMismatch,

    #[error("Spectrum file has no `{0}` column")]
    MissingColumn(&'static str),

    #[error("Wavelength step is {found} nm, calibration factor requires 1 nm")]
    NonUniformStep { found: f64 },

    #[error("Internal csv related error: {0}")]
    CsvError(String),
}
