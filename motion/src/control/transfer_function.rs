/*
    Discrete Transfer Function

    y[k] = (sum(num[i] * u[k-i]) - sum(den[j] * y[k-j], j >= 1)) / den[0]
*/

use super::*;

/* --------------------------- Code -------------------------- */
pub struct DiscreteTransferFunction<const NNUM: usize, const NDEN: usize> {
    num: [f32; NNUM],
    den: [f32; NDEN],
    inputs: [f32; NNUM],
    // outputs[j] holds y[k-1-j], the last slot is never read
    outputs: [f32; NDEN],
}

impl<const NNUM: usize, const NDEN: usize> DiscreteTransferFunction<NNUM, NDEN> {
    pub fn new(num: [f32; NNUM], den: [f32; NDEN]) -> Result<Self, ConfigError> {
        match den.first() {
            Some(leading) if *leading != 0.0 => {},
            _ => return Err(ConfigError::ZeroLeadingCoefficient),
        }

        Ok(Self {
            num,
            den,
            inputs: [0.0; NNUM],
            outputs: [0.0; NDEN],
        })
    }

    /// Swaps the coefficients and keeps the history.
    pub fn set_coefficients(&mut self, num: [f32; NNUM], den: [f32; NDEN]) -> Result<(), ConfigError> {
        match den.first() {
            Some(leading) if *leading != 0.0 => {},
            _ => return Err(ConfigError::ZeroLeadingCoefficient),
        }

        self.num = num;
        self.den = den;
        Ok(())
    }

    pub fn evaluate(&mut self, input: f32) -> f32 {
        if NNUM > 0 {
            self.inputs.copy_within(0..NNUM - 1, 1);
            self.inputs[0] = input;
        }

        let forward: f32 = self.num
            .iter()
            .zip(self.inputs.iter())
            .map(|(b, u)| b * u)
            .sum();

        let feedback: f32 = self.den
            .iter()
            .skip(1)
            .zip(self.outputs.iter())
            .map(|(a, y)| a * y)
            .sum();

        let output = (forward - feedback) / self.den[0];

        if NDEN > 1 {
            self.outputs.copy_within(0..NDEN - 1, 1);
        }
        self.outputs[0] = output;

        return output;
    }

    pub fn clear(&mut self) {
        self.inputs = [0.0; NNUM];
        self.outputs = [0.0; NDEN];
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_leading_denominator() {
        let result = DiscreteTransferFunction::new([1.0, 0.0], [0.0, 1.0]);
        assert_eq!(result.err(), Some(ConfigError::ZeroLeadingCoefficient));
    }

    #[test]
    fn normalises_by_leading_coefficient() {
        let mut tf = DiscreteTransferFunction::new([2.0], [4.0]).unwrap();
        assert_eq!(tf.evaluate(2.0), 1.0);
    }

    #[test]
    fn first_order_lag_step_response() {
        // y[k] = 0.5 u[k] + 0.5 y[k-1]
        let mut tf = DiscreteTransferFunction::new([0.5], [1.0, -0.5]).unwrap();
        assert_eq!(tf.evaluate(1.0), 0.5);
        assert_eq!(tf.evaluate(1.0), 0.75);
        assert_eq!(tf.evaluate(1.0), 0.875);
    }

    #[test]
    fn clear_leaves_no_residual_state() {
        let mut tf = DiscreteTransferFunction::new([0.3, 0.2, 0.1], [1.0, -1.2, 0.4]).unwrap();
        for sample in [5.0, -3.0, 8.0, 1.0] {
            tf.evaluate(sample);
        }

        tf.clear();
        for _ in 0..6 {
            assert_eq!(tf.evaluate(0.0), 0.0);
        }
    }
}
