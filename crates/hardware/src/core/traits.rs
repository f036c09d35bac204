//! Clocked Component Interface.
//!
//! This module defines the common trait for every sequential block in the model. It provides:
//! 1. **Clock Edge:** `tick` commits registered state from the inputs driven during the cycle.
//! 2. **Output Sampling:** `output` reads the combinational outputs settled after the edge.
//! 3. **Synchronous Reset:** `reset` returns every register to its power-on value.
//!
//! A value driven in cycle N is only observable through `output` after the
//! `tick` that ends cycle N. Nothing in the model returns a registered result
//! combinationally.

/// A synchronous hardware block driven by the global clock.
pub trait Clocked {
    /// Signals sampled on the clock edge.
    type Input;

    /// Signals presented after the clock edge.
    type Output;

    /// Executes one rising clock edge.
    ///
    /// # Arguments
    ///
    /// * `input` - The inputs held stable during the cycle that just ended.
    fn tick(&mut self, input: &Self::Input);

    /// Samples the outputs for the current cycle without mutating state.
    fn output(&self) -> Self::Output;

    /// Returns every register to its reset value.
    fn reset(&mut self);

    /// Drives `input` for one cycle and samples the result after the edge.
    ///
    /// # Returns
    ///
    /// The outputs visible one clock after `input` was presented.
    fn step(&mut self, input: &Self::Input) -> Self::Output {
        self.tick(input);
        self.output()
    }
}
