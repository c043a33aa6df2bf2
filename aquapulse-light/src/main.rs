use std::env;
use std::error::Error;

use aquapulse_light::pfd::{DEFAULT_FACTOR, PfdReport};
use aquapulse_light::spectrum::Spectrum;

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| "source.csv".to_string());

    let spectrum = Spectrum::from_csv(&path)?;
    let report = PfdReport::compute(&spectrum, DEFAULT_FACTOR)?;

    println!(
        "Spectral range: {} - {} nm; Wavelength step: {} nm",
        report.min_nm, report.max_nm, report.step as i64
    );
    println!("PFD: {}", report.total);
    println!(
        "PFD-R: {} | PFD-G: {} | PFD-B: {} | PFD-FR: {}",
        report.red, report.green, report.blue, report.far_red
    );
    println!("PFD-PAR: {}", report.par);

    Ok(())
}
