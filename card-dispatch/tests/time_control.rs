//! Display timeouts stepped with the `testing-time` helpers.

use std::time::Duration;

use card_dispatch::testing::{Observed, RecordingObserver};
use card_dispatch::{ActionController, ActionState, ControllerConfig, NetworkError, Transition};
use card_dispatch_core::{advance_time, pause_time, resume_time};
use tokio::time::Instant;

#[tokio::test]
async fn test_failure_display_stepped_by_hand() {
    pause_time();
    let mut quick_view: ActionController<(), _> = ActionController::new(
        "quick-view:sku123",
        ControllerConfig::quick_view(),
        RecordingObserver::new(),
    );
    let start = Instant::now();

    quick_view
        .trigger(start, || async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Err(NetworkError::Timeout)
        })
        .unwrap();

    advance_time(Duration::from_millis(300)).await;
    assert_eq!(quick_view.step().await.unwrap(), Some(Transition::Failed));
    assert_eq!(quick_view.state(), ActionState::Failed);

    advance_time(quick_view.config().failure_display).await;
    assert_eq!(quick_view.step().await.unwrap(), Some(Transition::Reset));
    assert!(start.elapsed() >= Duration::from_millis(300) + quick_view.config().failure_display);
    assert_eq!(
        quick_view.observer().events(),
        &[
            Observed::LoadingStarted,
            Observed::Failed(NetworkError::Timeout),
            Observed::Settled,
            Observed::Reset
        ]
    );
    resume_time();
}
