/// Descriptive statistics for one numeric column, matching the usual
/// count/mean/std/min/quartiles/max summary plus the column sum.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub sum: f64,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Percentile with linear interpolation between closest ranks, `p` in
/// `[0, 100]`. Expects `sorted` to be ascending.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = p / 100.0 * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            if lower == upper {
                sorted[lower]
            } else {
                let frac = pos - lower as f64;
                sorted[lower] + (sorted[upper] - sorted[lower]) * frac
            }
        }
    }
}

pub fn describe(values: &[f64]) -> Option<Describe> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(Describe {
        count: values.len(),
        mean: mean(values),
        std_dev: std_dev(values),
        min: sorted[0],
        q25: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q75: percentile(&sorted, 75.0),
        max: sorted[sorted.len() - 1],
        sum: values.iter().sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-9);
        // sample std of the classic example set
        assert!((std_dev(&values) - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_describe_quartiles_interpolate() {
        let d = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(d.count, 4);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
        assert_eq!(d.sum, 10.0);
        assert!((d.q25 - 1.75).abs() < 1e-9);
        assert!((d.median - 2.5).abs() < 1e-9);
        assert!((d.q75 - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_describe_empty_and_singleton() {
        assert!(describe(&[]).is_none());
        let d = describe(&[42.0]).unwrap();
        assert_eq!(d.median, 42.0);
        assert_eq!(d.std_dev, 0.0);
    }
}
