//! Manager lifecycle driven by an external scheduler

/// A progression manager with explicit lifecycle hooks.
///
/// The owner calls `init` once, `tick` every frame with the elapsed seconds,
/// and `shutdown` at teardown. `tick` before `init` or after `shutdown` is a
/// no-op.
pub trait Manager {
    /// Name used in logs
    fn name(&self) -> &'static str;

    fn init(&mut self);

    fn tick(&mut self, dt: f64);

    /// Stop ticking and drop every notification subscriber
    fn shutdown(&mut self);

    fn is_running(&self) -> bool;
}
