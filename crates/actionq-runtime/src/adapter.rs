use std::future::Future;

use actionq_core::Sequencer;
use tokio::task::JoinHandle;

// ─── Suspended wait ───────────────────────────────────────────────────────

/// Suspend the in-flight action until `fut` resolves.
///
/// Calls [`Sequencer::suspend`] immediately, then awaits `fut` on a local
/// task. Once it resolves the suspension is resumed and `on_ready` runs with
/// the output; it is expected to enqueue any children and call
/// [`Sequencer::complete`].
///
/// Anything enqueued by other code while `fut` is pending lands beside the
/// suspended action's ancestors, not underneath it.
///
/// Must be called from within a [`tokio::task::LocalSet`].
pub fn spawn_suspended<F, R>(seq: &Sequencer, fut: F, on_ready: R) -> JoinHandle<()>
where
    F: Future + 'static,
    F::Output: 'static,
    R: FnOnce(&Sequencer, F::Output) + 'static,
{
    let suspension = seq.suspend();
    tokio::task::spawn_local(async move {
        let out = fut.await;
        let seq = suspension.resume();
        on_ready(&seq, out);
    })
}

// ─── Deferred completion ──────────────────────────────────────────────────

/// Await `fut` without a suspension bracket, then run `on_ready`.
///
/// The action keeps its child frame open for the whole wait, so anything
/// enqueued meanwhile (by any code) runs as this action's child.
///
/// Must be called from within a [`tokio::task::LocalSet`].
pub fn spawn_deferred<F, R>(seq: &Sequencer, fut: F, on_ready: R) -> JoinHandle<()>
where
    F: Future + 'static,
    F::Output: 'static,
    R: FnOnce(&Sequencer, F::Output) + 'static,
{
    let seq = seq.clone();
    tokio::task::spawn_local(async move {
        let out = fut.await;
        on_ready(&seq, out);
    })
}
