//! Predictor state (component B): the 64-slot color cache, the previous
//! pixel, and the run counter, shared verbatim by the encoder and decoder
//! engines. Construction is the only allocation; every operation afterward
//! is O(1) and infallible, per spec.md §4.2.

use crate::pixel::Pixel;

pub(crate) struct Predictor<P: Pixel> {
    cache: [P; 64],
    prev: P,
    run: u8,
}

impl<P: Pixel> Predictor<P> {
    #[inline(always)]
    pub(crate) fn new() -> Self {
        Predictor { cache: [P::zero(); 64], prev: P::initial_prev(), run: 0 }
    }

    #[inline(always)]
    pub(crate) fn prev(&self) -> P {
        self.prev
    }

    #[inline(always)]
    pub(crate) fn set_prev(&mut self, p: P) {
        self.prev = p;
    }

    #[inline(always)]
    pub(crate) fn probe(&self, hash: u8) -> P {
        self.cache[hash as usize]
    }

    #[inline(always)]
    pub(crate) fn store(&mut self, p: P) {
        self.cache[p.hash() as usize] = p;
    }

    #[inline(always)]
    pub(crate) fn run(&self) -> u8 {
        self.run
    }

    /// Increments the run counter and returns the new value.
    #[inline(always)]
    pub(crate) fn bump_run(&mut self) -> u8 {
        self.run += 1;
        self.run
    }

    /// Reads out the current run length and resets the counter to 0,
    /// for flushing into a `QOI_OP_RUN` opcode on the encode side.
    #[inline(always)]
    pub(crate) fn take_run(&mut self) -> u8 {
        let run = self.run;
        self.run = 0;
        run
    }

    /// Sets the run counter directly, for the decode side consuming a
    /// freshly read `QOI_OP_RUN` opcode.
    #[inline(always)]
    pub(crate) fn set_run(&mut self, run: u8) {
        self.run = run;
    }

    /// Consumes one step of an in-progress run.
    #[inline(always)]
    pub(crate) fn dec_run(&mut self) {
        self.run -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgba;

    #[test]
    fn initial_state_matches_spec_asymmetry() {
        let predictor = Predictor::<Rgba>::new();
        assert_eq!(predictor.prev().a(), 255);
        assert_eq!(predictor.probe(0).a(), 0); // hash((0,0,0,0)) == 0, per spec.md Scenario 2
    }
}
