use tokio::select;
use tokio::sync::watch;

#[inline]
pub async fn run_event_loop<F: Future<Output = ()>>(
    event_loop: F,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    select! {
        biased;

        _ = kill_rx.wait_for(|killed| *killed) => {
            debug!("killed");
        }
        _ = event_loop => {}
    }
    debug!("will terminate");
}
