//! Growth analysis of population sequences.

/// Finds the smallest period `p < max_period` such that every window
/// `sequence[i], sequence[i + p], ..., sequence[i + (degree + 1) p]`
/// for `i < max_period` has a vanishing difference of order `degree + 1`.
///
/// With `degree = 1`, this finds patterns whose population grows by the
/// same amount every `p` generations, e.g. puffers and guns.
///
/// Windows that run past the end of the sequence fail.
pub(crate) fn deep_period(sequence: &[usize], max_period: usize, degree: usize) -> Option<usize> {
    (1..max_period).find(|&p| {
        (0..max_period).all(|i| {
            let mut difference = match (0..degree + 2)
                .map(|j| sequence.get(i + j * p).map(|&n| n as i64))
                .collect::<Option<Vec<_>>>()
            {
                Some(window) => window,
                None => return false,
            };
            for _ in 0..=degree {
                for k in 0..=degree {
                    difference[k] -= difference[k + 1];
                }
            }
            difference[0] == 0
        })
    })
}

/// The slope of the least-squares line through the points.
///
/// Returns `NaN` for fewer than two distinct `x`-values.
pub(crate) fn regress(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let (var, cov) = points.iter().fold((0.0, 0.0), |(var, cov), &(x, y)| {
        (
            var + (x - mean_x) * (x - mean_x),
            cov + (y - mean_y) * (x - mean_x),
        )
    });
    cov / var
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_differences() {
        let sequence: Vec<usize> = (0..300).map(|i| 10 + 3 * i).collect();
        assert_eq!(deep_period(&sequence, 100, 1), Some(1));
    }

    #[test]
    fn periodic_differences() {
        let increments = [5, 0, 1, 2];
        let sequence: Vec<_> = (0..300)
            .scan(7, |pop, i| {
                *pop += increments[i % 4];
                Some(*pop)
            })
            .collect();
        assert_eq!(deep_period(&sequence, 100, 1), Some(4));
    }

    #[test]
    fn no_period() {
        let sequence: Vec<usize> = (0..300).map(|i| i * i).collect();
        assert_eq!(deep_period(&sequence, 100, 1), None);
        let sequence: Vec<usize> = (0..300).map(|i| (i as f64).sqrt() as usize).collect();
        assert_eq!(deep_period(&sequence, 100, 1), None);
    }

    #[test]
    fn slopes() {
        let points: Vec<_> = (1..100)
            .map(|i| {
                let x = (i as f64).log10();
                (x, 2.0 * x + 1.0)
            })
            .collect();
        assert!((regress(&points) - 2.0).abs() < 1e-9);
        assert!(regress(&[]).is_nan());
    }
}
