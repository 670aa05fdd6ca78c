//! Search for the smallest feasible bound

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One feasibility check made during the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub bound: usize,
    pub feasible: bool,
}

/// Smallest bound in `[0, upper]` accepted by a monotone `feasible`.
///
/// Checks `upper` first, halves while the bound stays feasible, then binary
/// searches between the last infeasible and the smallest feasible bound.
///
/// # Errors
///
/// Returns [`Error::InfeasibleAtMaximum`] when `upper` itself is rejected and
/// passes through any error from `feasible`.
pub fn minimize_bound<F>(upper: usize, mut feasible: F) -> Result<usize>
where
    F: FnMut(usize) -> Result<bool>,
{
    if !feasible(upper)? {
        return Err(Error::InfeasibleAtMaximum { bound: upper });
    }

    let mut smallest_feasible = upper;
    let mut largest_infeasible = loop {
        if smallest_feasible == 0 {
            return Ok(0);
        }
        let bound = smallest_feasible / 2;
        if feasible(bound)? {
            smallest_feasible = bound;
        } else {
            break bound;
        }
    };

    while smallest_feasible - largest_infeasible > 1 {
        let bound = largest_infeasible + (smallest_feasible - largest_infeasible) / 2;
        if feasible(bound)? {
            smallest_feasible = bound;
        } else {
            largest_infeasible = bound;
        }
    }
    Ok(smallest_feasible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(upper: usize, threshold: usize) -> (usize, Vec<usize>) {
        let mut attempts = Vec::new();
        let found = minimize_bound(upper, |bound| {
            attempts.push(bound);
            Ok(bound >= threshold)
        })
        .unwrap();
        (found, attempts)
    }

    #[test]
    fn finds_every_threshold() {
        for upper in [1, 2, 7, 64, 765] {
            for threshold in 0..=upper {
                let (found, attempts) = search(upper, threshold);
                assert_eq!(found, threshold, "upper {upper}");
                assert!(attempts.len() <= 2 * (usize::BITS - upper.leading_zeros()) as usize + 2);
            }
        }
    }

    #[test]
    fn starts_at_the_upper_bound_and_halves() {
        let (found, attempts) = search(400, 41);
        assert_eq!(found, 41);
        assert_eq!(&attempts[..5], &[400, 200, 100, 50, 25]);
    }

    #[test]
    fn infeasible_upper_bound_is_an_error() {
        let result = minimize_bound(10, |_| Ok(false));
        assert!(matches!(result, Err(Error::InfeasibleAtMaximum { bound: 10 })));
    }

    #[test]
    fn attempt_errors_abort_the_search() {
        let mut calls = 0;
        let result = minimize_bound(100, |bound| {
            calls += 1;
            if bound < 100 {
                Err(Error::Backend {
                    message: "solver gave up".to_string(),
                })
            } else {
                Ok(true)
            }
        });
        assert!(matches!(result, Err(Error::Backend { .. })));
        assert_eq!(calls, 2);
    }
}
