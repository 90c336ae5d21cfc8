//! Recursive comb (echo) filter.
//!
//! The filter implements
//!
//! ```text
//! y[n] = (1 - alfa) * x[n] + alfa * y[n - k]
//! ```
//!
//! which as a linear filter has numerator `b = [1 - alfa]` and a
//! denominator of length `k + 1` that is zero except for `a[0] = 1` and
//! `a[k] = -alfa`. [`CombFilter::apply`] runs it forward and then backward
//! over the whole signal so the phase shifts of the two passes cancel.

/// Error returned when a signal cannot be filtered.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("signal of {len} samples is too short, zero-phase filtering needs more than {padlen}")]
    SignalTooShort { len: usize, padlen: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombFilter {
    delay: usize,
    alfa: f64,
}

impl CombFilter {
    pub fn new(delay: usize, alfa: f64) -> Self {
        if delay == 0 {
            log::warn!("comb filter with zero delay has no feedback, it only scales by {}", 1.0 - alfa);
        }
        CombFilter { delay, alfa }
    }

    pub fn delay(&self) -> usize {
        self.delay
    }

    pub fn alfa(&self) -> f64 {
        self.alfa
    }

    /// Feed-forward gain applied to the current input sample.
    pub fn gain(&self) -> f64 {
        1.0 - self.alfa
    }

    /// Numerator and denominator coefficients `(b, a)`.
    pub fn coefficients(&self) -> (Vec<f64>, Vec<f64>) {
        let b = vec![self.gain()];
        let mut a = vec![0.0; self.delay + 1];
        a[0] = 1.0;
        if self.delay > 0 {
            a[self.delay] = -self.alfa;
        }
        (b, a)
    }

    /// Number of samples added at each end of the signal before the two
    /// passes: three times the filter order plus one.
    pub fn pad_len(&self) -> usize {
        3 * (self.delay + 1)
    }

    /// Initial state that makes the filter start in steady state for a
    /// unit step. Every delay slot holds `alfa`, since the DC gain of the
    /// filter is one.
    pub fn steady_state(&self) -> Vec<f64> {
        vec![self.alfa; self.delay]
    }

    /// Single causal pass over `input`.
    ///
    /// `state` holds the feedback contributions for the first `delay`
    /// outputs (a missing slot counts as zero). Once `n >= delay` the
    /// feedback is taken from the output itself.
    pub fn forward(&self, input: &[f64], state: &[f64]) -> Vec<f64> {
        let gain = self.gain();
        if self.delay == 0 {
            return input.iter().map(|&x| gain * x).collect();
        }
        let mut output: Vec<f64> = Vec::with_capacity(input.len());
        for (n, &x) in input.iter().enumerate() {
            let feedback = if n < self.delay {
                state.get(n).copied().unwrap_or(0.0)
            } else {
                self.alfa * output[n - self.delay]
            };
            output.push(gain * x + feedback);
        }
        output
    }

    /// Zero-phase filtering: odd extension, forward pass, backward pass,
    /// padding removed. The output has the same length as `input`.
    pub fn apply(&self, input: &[f64]) -> Result<Vec<f64>, FilterError> {
        let padlen = self.pad_len();
        if input.len() <= padlen {
            return Err(FilterError::SignalTooShort {
                len: input.len(),
                padlen,
            });
        }
        log::debug!(
            "filtering {} samples with k={} alfa={} padlen={}",
            input.len(),
            self.delay,
            self.alfa,
            padlen
        );

        let extended = odd_extend(input, padlen);
        let zi = self.steady_state();

        let x0 = extended[0];
        let state: Vec<f64> = zi.iter().map(|z| z * x0).collect();
        let mut forward = self.forward(&extended, &state);
        forward.reverse();

        let y0 = forward[0];
        let state: Vec<f64> = zi.iter().map(|z| z * y0).collect();
        let mut backward = self.forward(&forward, &state);
        backward.reverse();

        let end = backward.len() - padlen;
        backward.truncate(end);
        backward.drain(..padlen);
        Ok(backward)
    }
}

/// Extends `x` by `padlen` samples on both sides with a point reflection
/// about its end samples. Requires `x.len() > padlen`.
fn odd_extend(x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];
    let mut extended = Vec::with_capacity(n + 2 * padlen);
    extended.extend((1..=padlen).rev().map(|i| 2.0 * first - x[i]));
    extended.extend_from_slice(x);
    extended.extend((1..=padlen).map(|i| 2.0 * last - x[n - 1 - i]));
    extended
}
