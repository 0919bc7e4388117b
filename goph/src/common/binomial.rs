// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Binomial tail probabilities for the early-termination test.
//!
//! For small n the cumulative distribution is computed with the iterative
//! PMF recurrence; for large n a normal approximation with continuity
//! correction is used instead. Both paths saturate to [0, 1] and never
//! raise on floating-point edge cases.

/// The recurrence stays exact up to this n; beyond it the normal
/// approximation takes over when its validity guard holds.
const MAX_EXACT_N: u64 = 30;

/// Tail probabilities of X ~ Binomial(n, p).
///
/// Mean and standard deviation for the normal-approximation path are
/// computed once at construction, so one instance can serve many tail
/// queries within a single estimation call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BinomialTail {
    n: u64,
    p: f64,
    /// (mean, stddev) when the normal approximation applies.
    normal: Option<(f64, f64)>,
}

impl BinomialTail {
    /// Create a tail evaluator for X ~ Binomial(n, p).
    ///
    /// The normal approximation is used for n > 30 when np >= 5 and
    /// n(1 - p) >= 5; everywhere else the exact recurrence applies.
    pub(crate) fn new(n: u64, p: f64) -> Self {
        let nf = n as f64;
        let normal = if n > MAX_EXACT_N && nf * p >= 5.0 && nf * (1.0 - p) >= 5.0 {
            Some((nf * p, (nf * p * (1.0 - p)).sqrt()))
        } else {
            None
        };

        Self { n, p, normal }
    }

    /// P(X <= k). A negative k yields 0.
    pub(crate) fn at_most(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        let k = k as u64;
        if k >= self.n {
            return 1.0;
        }
        // k < n from here on
        if self.p <= 0.0 {
            return 1.0;
        }
        if self.p >= 1.0 {
            return 0.0;
        }

        if let Some((mean, std_dev)) = self.normal {
            let z = (k as f64 + 0.5 - mean) / std_dev;
            return std_normal_cdf(z).clamp(0.0, 1.0);
        }

        if self.p <= 0.5 {
            exact_cdf(self.n, self.p, k)
        } else {
            // Mirror through the complement so the recurrence always starts
            // from (1-p)^n with p <= 0.5.
            (1.0 - exact_cdf(self.n, 1.0 - self.p, self.n - k - 1)).clamp(0.0, 1.0)
        }
    }

    /// P(X >= k). A k of 0 or less yields 1.
    pub(crate) fn at_least(&self, k: i64) -> f64 {
        if k <= 0 {
            return 1.0;
        }
        if k as u64 > self.n {
            return 0.0;
        }
        (1.0 - self.at_most(k - 1)).clamp(0.0, 1.0)
    }
}

/// Exact P(X <= k) for X ~ Binomial(n, p) via the PMF recurrence
/// P(X=i) = P(X=i-1) * (n-i+1)/i * p/(1-p), starting at (1-p)^n.
fn exact_cdf(n: u64, p: f64, k: u64) -> f64 {
    let odds = p / (1.0 - p);
    let mut pmf = (1.0 - p).powf(n as f64);
    let mut sum = pmf;
    for i in 1..=k {
        pmf *= (n - i + 1) as f64 / i as f64 * odds;
        sum += pmf;
    }
    sum.clamp(0.0, 1.0)
}

/// Standard normal CDF via the error function.
fn std_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz-Stegun 7.1.26 rational approximation of erf.
///
/// Maximum absolute error 1.5e-7, well inside what the tail test needs.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_small_n() {
        let tail = BinomialTail::new(10, 0.5);
        assert!((tail.at_most(5) - 0.623046875).abs() < 1e-12);
        assert_eq!(tail.at_most(-1), 0.0);
        assert_eq!(tail.at_most(10), 1.0);
        assert_eq!(tail.at_least(0), 1.0);
        assert_eq!(tail.at_least(11), 0.0);

        let tail = BinomialTail::new(20, 0.3);
        assert!((tail.at_most(4) - 0.23750777887760133).abs() < 1e-9);
        assert!((tail.at_least(10) - 0.047961897331344594).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_p() {
        let tail = BinomialTail::new(10, 0.0);
        assert_eq!(tail.at_most(0), 1.0);
        assert_eq!(tail.at_least(1), 0.0);

        let tail = BinomialTail::new(10, 1.0);
        assert_eq!(tail.at_most(9), 0.0);
        assert_eq!(tail.at_most(10), 1.0);
        assert_eq!(tail.at_least(10), 1.0);
    }

    #[test]
    fn test_normal_approximation() {
        // n > 30 with np and n(1-p) comfortably above 5
        let tail = BinomialTail::new(100, 0.5);
        assert!(tail.normal.is_some());
        // exact value is 0.53979...; the approximation lands within 1e-3
        assert!((tail.at_most(50) - 0.5397946186935894).abs() < 1e-3);
        assert_eq!(tail.at_most(-1), 0.0);
        assert_eq!(tail.at_most(100), 1.0);
    }

    #[test]
    fn test_exact_large_n_skewed() {
        // n > 30 but n(1-p) = 4 < 5: guard rejects the approximation and
        // the complement-mirrored recurrence runs instead
        let tail = BinomialTail::new(40, 0.9);
        assert!(tail.normal.is_none());
        assert!((tail.at_most(36) - 0.5768693469069978).abs() < 1e-9);
        assert!((tail.at_most(33) - 0.09951642396555099).abs() < 1e-9);
    }

    #[test]
    fn test_tails_are_complementary() {
        let tail = BinomialTail::new(25, 0.4);
        for k in 0..=25 {
            let total = tail.at_most(k - 1) + tail.at_least(k);
            assert!((total - 1.0).abs() < 1e-9, "k = {k}");
        }
    }
}
