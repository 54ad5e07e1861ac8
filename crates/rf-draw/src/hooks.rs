//! Spin lifecycle hooks

use crate::engine::SpinOutcome;

/// Callbacks the engine invokes on lifecycle transitions.
///
/// All methods default to no-ops. Panics inside a hook propagate to the
/// caller of the engine method that fired it.
pub trait SpinHooks {
    /// Fired synchronously inside `spin()`, before the first reel entry
    fn on_spin_start(&mut self) {}

    /// Fired once per completed spin, after removal, the counter update and
    /// the return to idle
    fn on_spin_end(&mut self, _outcome: &SpinOutcome) {}

    /// Fired after a pool setter replaced a pool while idle
    fn on_pool_changed(&mut self) {}
}

/// No hooks
impl SpinHooks for () {}

type StartFn = Box<dyn FnMut()>;
type EndFn = Box<dyn FnMut(&SpinOutcome)>;

/// Closure-backed hooks
#[derive(Default)]
pub struct Callbacks {
    spin_start: Option<StartFn>,
    spin_end: Option<EndFn>,
    pool_changed: Option<StartFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spin_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.spin_start = Some(Box::new(f));
        self
    }

    pub fn with_spin_end(mut self, f: impl FnMut(&SpinOutcome) + 'static) -> Self {
        self.spin_end = Some(Box::new(f));
        self
    }

    pub fn with_pool_changed(mut self, f: impl FnMut() + 'static) -> Self {
        self.pool_changed = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("spin_start", &self.spin_start.is_some())
            .field("spin_end", &self.spin_end.is_some())
            .field("pool_changed", &self.pool_changed.is_some())
            .finish()
    }
}

impl SpinHooks for Callbacks {
    fn on_spin_start(&mut self) {
        if let Some(f) = self.spin_start.as_mut() {
            f();
        }
    }

    fn on_spin_end(&mut self, outcome: &SpinOutcome) {
        if let Some(f) = self.spin_end.as_mut() {
            f(outcome);
        }
    }

    fn on_pool_changed(&mut self) {
        if let Some(f) = self.pool_changed.as_mut() {
            f();
        }
    }
}
