//! Writes a synthetic Iris-like CSV for trying out the viewer.
//!
//! Usage: `generate_sample [lowercase|capitalized] [OUTPUT]`

use anyhow::{Context, Result, bail};

/// (label stem, sepal length, sepal width, petal length, petal width) as (mean, std).
type SpeciesProfile = (&'static str, [(f64, f64); 4]);

/// Per-species means and standard deviations (cm) of Fisher's 1936 Iris
/// measurements. Rows are drawn independently per column, so the output
/// keeps the species clusters but not the within-species correlations.
const PROFILES: [SpeciesProfile; 3] = [
    ("setosa", [(5.01, 0.35), (3.43, 0.38), (1.46, 0.17), (0.25, 0.11)]),
    ("versicolor", [(5.94, 0.52), (2.77, 0.31), (4.26, 0.47), (1.33, 0.20)]),
    ("virginica", [(6.59, 0.64), (2.97, 0.32), (5.55, 0.55), (2.03, 0.27)]),
];

const ROWS_PER_SPECIES: usize = 50;

/// Fixed so repeated runs write the same file.
const SEED: u64 = 1936;

/// SplitMix64 stream with a cached second Box-Muller deviate.
struct Measurements {
    state: u64,
    spare: Option<f64>,
}

impl Measurements {
    fn seeded(seed: u64) -> Self {
        Measurements { state: seed, spare: None }
    }

    fn next_bits(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in (0, 1].
    fn unit(&mut self) -> f64 {
        ((self.next_bits() >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        let radius = (-2.0 * self.unit().ln()).sqrt();
        let theta = std::f64::consts::TAU * self.unit();
        self.spare = Some(radius * theta.sin());
        radius * theta.cos()
    }

    /// One measurement rounded to a millimetre, as in the published table.
    fn sample_cm(&mut self, (mean, std): (f64, f64)) -> String {
        let v = mean + std * self.standard_normal();
        format!("{:.1}", v.max(0.1))
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let capitalized = match args.next().as_deref() {
        None | Some("lowercase") => false,
        Some("capitalized") => true,
        Some(other) => bail!("unknown layout '{other}', expected lowercase or capitalized"),
    };
    let output_path = args.next().unwrap_or_else(|| "iris.csv".to_string());

    let (header, prefix) = if capitalized {
        (["SepalLength", "SepalWidth", "PetalLength", "PetalWidth", "Species"], "Iris-")
    } else {
        (["sepalLength", "sepalWidth", "petalLength", "petalWidth", "species"], "")
    };

    let mut draw = Measurements::seeded(SEED);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(header)?;

    for (stem, measures) in &PROFILES {
        let label = format!("{prefix}{stem}");
        for _ in 0..ROWS_PER_SPECIES {
            let mut row: Vec<String> = measures.iter().map(|&m| draw.sample_cm(m)).collect();
            row.push(label.clone());
            writer.write_record(&row)?;
        }
    }
    writer.flush()?;

    println!(
        "Wrote {} rows ({} layout) to {output_path}",
        ROWS_PER_SPECIES * PROFILES.len(),
        if capitalized { "capitalized" } else { "lowercase" }
    );
    Ok(())
}
