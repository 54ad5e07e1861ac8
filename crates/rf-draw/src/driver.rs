//! Real-time spin playback on tokio

use crate::engine::{NameDrawEngine, SpinOutcome, SpinStep};
use crate::error::DrawResult;
use crate::hooks::SpinHooks;

type AdvanceFn = Box<dyn FnMut(usize, &str)>;

/// Plays a spin in real time.
///
/// Each reel advance sleeps the delay reported by the engine before the next
/// step is taken. The driver borrows the engine mutably for the whole spin,
/// so no other spin or pool mutation can interleave.
#[derive(Default)]
pub struct SpinDriver {
    on_advance: Option<AdvanceFn>,
}

impl SpinDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe every reel entry as it is shown (index, entry)
    pub fn on_advance(mut self, f: impl FnMut(usize, &str) + 'static) -> Self {
        self.on_advance = Some(Box::new(f));
        self
    }

    fn show(&mut self, index: usize, entry: &str) {
        if let Some(f) = self.on_advance.as_mut() {
            f(index, entry);
        }
    }

    /// Start a spin and play it to completion.
    ///
    /// Returns `Ok(None)` without doing anything if the engine is already
    /// spinning.
    pub async fn play<H: SpinHooks>(
        &mut self,
        engine: &mut NameDrawEngine<H>,
    ) -> DrawResult<Option<SpinOutcome>> {
        if engine.is_spinning() {
            return Ok(None);
        }
        engine.spin()?;

        while let Some(step) = engine.step() {
            match step {
                SpinStep::Advance {
                    index,
                    entry,
                    delay,
                } => {
                    self.show(index, &entry);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                SpinStep::Finished(outcome) => {
                    self.show(outcome.frame.len() - 1, &outcome.winner);
                    return Ok(Some(outcome));
                }
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for SpinDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinDriver")
            .field("on_advance", &self.on_advance.is_some())
            .finish()
    }
}
