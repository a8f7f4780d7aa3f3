use crate::Scale;
use crate::scoring::Polarity;

/// GAF: Global Assessment of Functioning, 0–100.
/// Higher is better, so normalization inverts it.
pub struct Gaf;

impl Scale for Gaf {
    fn id(&self) -> &str {
        "GAF"
    }

    fn name(&self) -> &str {
        "Global Assessment of Functioning"
    }

    fn max_score(&self) -> f64 {
        100.0
    }

    fn polarity(&self) -> Polarity {
        Polarity::Functioning
    }
}
