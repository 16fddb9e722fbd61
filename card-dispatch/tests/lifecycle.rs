//! End-to-end lifecycle tests: controllers, the simulated backend, channel
//! observers and an effect store working together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use card_dispatch::testing::{Observed, RecordingObserver};
use card_dispatch::{
    assert_not_observed, assert_observed, Action, ActionController, ActionId, ActionState,
    BackendConfig, ChannelObserver, Clock, ControllerConfig, DispatchResult, EffectStore,
    Lifecycle, ManualClock, MemoryStore, NetworkError, ObserverError, SimulatedBackend,
    ToggleController, Transition, Trigger, WishlistPrefs,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn reliable_backend() -> SimulatedBackend {
    SimulatedBackend::new(BackendConfig {
        failure_rate: 0.0,
        seed: Some(1),
        ..BackendConfig::default()
    })
}

fn failing_backend() -> SimulatedBackend {
    SimulatedBackend::new(BackendConfig {
        failure_rate: 1.0,
        seed: Some(1),
        ..BackendConfig::default()
    })
}

fn assert_near(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + ms(10),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}

#[derive(Clone, Debug, PartialEq)]
enum CartMsg {
    Press,
    DidStart,
    DidAdd(u32),
    DidFail(String),
    DidSettle,
    DidReset,
}

impl Action for CartMsg {
    fn name(&self) -> &'static str {
        match self {
            CartMsg::Press => "Press",
            CartMsg::DidStart => "DidStart",
            CartMsg::DidAdd(_) => "DidAdd",
            CartMsg::DidFail(_) => "DidFail",
            CartMsg::DidSettle => "DidSettle",
            CartMsg::DidReset => "DidReset",
        }
    }
}

fn map_cart(_id: &ActionId, event: Lifecycle<'_, u32>) -> Option<CartMsg> {
    Some(match event {
        Lifecycle::LoadingStarted => CartMsg::DidStart,
        Lifecycle::Succeeded(count) => CartMsg::DidAdd(*count),
        Lifecycle::Failed(e) => CartMsg::DidFail(e.to_string()),
        Lifecycle::Settled => CartMsg::DidSettle,
        Lifecycle::Reset => CartMsg::DidReset,
    })
}

#[tokio::test(start_paused = true)]
async fn test_add_to_cart_success_timeline() {
    let backend = reliable_backend();
    let mut cart = ActionController::new(
        ActionId::scoped("add-to-cart", "sku123"),
        ControllerConfig::add_to_cart(),
        RecordingObserver::new(),
    );
    let start = Instant::now();
    let mut states = vec![cart.state()];

    let b = backend.clone();
    let outcome = cart.trigger(start, move || b.add_to_cart("sku123")).unwrap();
    assert_eq!(outcome, Trigger::Started);
    states.push(cart.state());

    assert_eq!(cart.step().await.unwrap(), Some(Transition::Succeeded));
    assert_near(start.elapsed(), ms(1500));
    states.push(cart.state());

    assert_eq!(cart.step().await.unwrap(), Some(Transition::Reset));
    assert_near(start.elapsed(), ms(3500));
    states.push(cart.state());

    assert_eq!(
        states,
        vec![
            ActionState::Idle,
            ActionState::Pending,
            ActionState::Succeeded,
            ActionState::Idle
        ]
    );
    assert_eq!(
        cart.observer().events(),
        &[
            Observed::LoadingStarted,
            Observed::Succeeded(1),
            Observed::Settled,
            Observed::Reset
        ]
    );
    assert_eq!(backend.cart_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_second_click_is_ignored() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut cart = ActionController::new(
        "add-to-cart:sku123",
        ControllerConfig::add_to_cart(),
        RecordingObserver::new(),
    );
    let clock = ManualClock::default();

    let perform = |calls: Arc<AtomicUsize>| {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(ms(1500)).await;
                Ok::<u32, NetworkError>(1)
            }
        }
    };

    assert_eq!(
        cart.trigger(clock.now(), perform(calls.clone())).unwrap(),
        Trigger::Started
    );
    clock.advance(ms(100));
    assert_ne!(
        cart.trigger(clock.now(), perform(calls.clone())).unwrap(),
        Trigger::Started
    );

    cart.run_until_idle().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cart.observer().count(card_dispatch::Hook::LoadingStarted), 1);
}

#[tokio::test(start_paused = true)]
async fn test_nan_failure_rate_still_settles() {
    let backend = SimulatedBackend::new(BackendConfig {
        failure_rate: f64::NAN,
        ..BackendConfig::default()
    });
    let mut cart = ActionController::new(
        ActionId::scoped("add-to-cart", "sku123"),
        ControllerConfig::add_to_cart(),
        RecordingObserver::new(),
    );

    let b = backend.clone();
    cart.trigger(Instant::now(), move || b.add_to_cart("sku123"))
        .unwrap();
    let settled = tokio::time::timeout(Duration::from_secs(60), cart.step())
        .await
        .expect("controller stuck in flight");

    assert_eq!(settled.unwrap(), Some(Transition::Succeeded));
    assert!(!cart.is_busy());
    cart.run_until_idle().await.unwrap();
    assert_eq!(cart.state(), ActionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_never_settling_action_stays_pending() {
    let mut cart = ActionController::new(
        "add-to-cart:sku123",
        ControllerConfig::add_to_cart(),
        RecordingObserver::<u32>::new(),
    );

    cart.trigger(Instant::now(), || std::future::pending()).unwrap();

    let waited = tokio::time::timeout(Duration::from_secs(3600), cart.step()).await;
    assert!(waited.is_err());
    assert_eq!(cart.state(), ActionState::Pending);
    assert!(cart.is_busy());
    assert_not_observed!(cart.observer().events(), Observed::Succeeded(_));
    assert_not_observed!(cart.observer().events(), Observed::Failed(_));

    // Still guarded long after the debounce window
    let later = cart
        .trigger(Instant::now(), || async { Ok(1) })
        .unwrap();
    assert_eq!(later, Trigger::InFlight);
}

#[tokio::test(start_paused = true)]
async fn test_failure_then_retry_succeeds() {
    let mut cart = ActionController::new(
        "add-to-cart:sku123",
        ControllerConfig::add_to_cart(),
        RecordingObserver::new(),
    );
    let start = Instant::now();

    let down = failing_backend();
    cart.trigger(start, move || down.add_to_cart("sku123")).unwrap();
    assert_eq!(cart.step().await.unwrap(), Some(Transition::Failed));
    assert_eq!(cart.state(), ActionState::Failed);
    assert!(!cart.is_busy());
    assert_observed!(
        cart.observer().events(),
        Observed::Failed(NetworkError::Unavailable(_))
    );

    // Retry while the error is still displayed
    let up = reliable_backend();
    let retry = cart
        .trigger(Instant::now(), move || up.add_to_cart("sku123"))
        .unwrap();
    assert_eq!(retry, Trigger::Started);

    cart.run_until_idle().await.unwrap();
    assert_near(start.elapsed(), ms(1500 + 1500 + 2000));
    assert_observed!(cart.observer().events(), Observed::Succeeded(1));
    assert_eq!(cart.observer().count(card_dispatch::Hook::Reset), 1);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_product_id_reports_failure() {
    let backend = reliable_backend();
    let mut cart = ActionController::new(
        "add-to-cart:bad",
        ControllerConfig::add_to_cart(),
        RecordingObserver::new(),
    );

    cart.trigger(Instant::now(), move || backend.add_to_cart("bad id!"))
        .unwrap();
    cart.run_until_idle().await.unwrap();

    assert_observed!(
        cart.observer().events(),
        Observed::Failed(NetworkError::InvalidRequest(_))
    );
}

#[derive(Debug, Default)]
struct CartView {
    busy: bool,
    count: u32,
    error: Option<String>,
    presses: u32,
}

#[derive(Debug, PartialEq)]
enum CartEffect {
    Add,
}

fn cart_reducer(view: &mut CartView, msg: CartMsg) -> DispatchResult<CartEffect> {
    match msg {
        CartMsg::Press => {
            view.presses += 1;
            DispatchResult::effect(CartEffect::Add)
        }
        CartMsg::DidStart => {
            view.busy = true;
            view.error = None;
            DispatchResult::changed()
        }
        CartMsg::DidAdd(count) => {
            view.count = count;
            DispatchResult::changed()
        }
        CartMsg::DidFail(e) => {
            view.error = Some(e);
            DispatchResult::changed()
        }
        CartMsg::DidSettle => {
            view.busy = false;
            DispatchResult::changed()
        }
        CartMsg::DidReset => {
            view.error = None;
            DispatchResult::changed()
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_store_driven_by_channel_observer() {
    let backend = reliable_backend();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut store = EffectStore::new(CartView::default(), cart_reducer);
    let mut cart = ActionController::new(
        "add-to-cart:sku123",
        ControllerConfig::add_to_cart(),
        ChannelObserver::new(tx.clone(), map_cart),
    );

    // Three presses in one burst
    for _ in 0..3 {
        tx.send(CartMsg::Press).unwrap();
    }

    let mut seen = Vec::new();
    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                seen.push(msg.clone());
                let done = msg == CartMsg::DidReset;
                for effect in store.dispatch(msg).effects {
                    match effect {
                        CartEffect::Add => {
                            let b = backend.clone();
                            cart.trigger(Instant::now(), move || b.add_to_cart("sku123")).unwrap();
                        }
                    }
                }
                if done {
                    break;
                }
            }
            Some(completion) = cart.next_completion() => {
                cart.apply(completion).unwrap();
            }
        }
    }

    let view = store.state();
    assert_eq!(view.presses, 3);
    assert_eq!(view.count, 1);
    assert!(!view.busy);
    assert_eq!(backend.cart_count(), 1);
    assert_eq!(
        seen.iter().filter(|m| **m == CartMsg::DidStart).count(),
        1,
        "one start for the whole burst: {seen:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_closed_channel_still_clears_busy() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut cart = ActionController::new(
        "add-to-cart:sku123",
        ControllerConfig::add_to_cart(),
        ChannelObserver::new(tx, map_cart),
    );

    cart.trigger(Instant::now(), || async { Ok(4) }).unwrap();
    drop(rx);

    let err = cart.step().await.unwrap_err();
    assert_eq!(err, ObserverError::ChannelClosed);
    assert_eq!(cart.state(), ActionState::Succeeded);
    assert!(!cart.is_busy());

    // Reset still arrives; its hook fails the same way
    assert_eq!(cart.step().await, Err(ObserverError::ChannelClosed));
    assert_eq!(cart.state(), ActionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_wishlist_toggle_persists_confirmed_value() {
    let backend = reliable_backend();
    let mut prefs = WishlistPrefs::new(MemoryStore::new());
    let mut wishlist = ToggleController::with_initial(
        ActionId::scoped("wishlist", "sku123"),
        ControllerConfig::wishlist(),
        RecordingObserver::new(),
        prefs.contains("sku123"),
    );

    let b = backend.clone();
    wishlist
        .toggle(Instant::now(), move |on| b.set_wishlisted("sku123", on))
        .unwrap();
    assert!(wishlist.value());

    assert_eq!(wishlist.step().await.unwrap(), Some(Transition::Succeeded));
    prefs.set("sku123", wishlist.committed()).unwrap();
    assert!(prefs.contains("sku123"));

    wishlist.run_until_idle().await.unwrap();
    let down = failing_backend();
    wishlist
        .toggle(Instant::now(), move |on| down.set_wishlisted("sku123", on))
        .unwrap();
    assert!(!wishlist.value(), "removal shown while pending");

    assert_eq!(wishlist.step().await.unwrap(), Some(Transition::Failed));
    assert!(wishlist.value(), "reverted after failure");
    assert!(wishlist.committed());
}

#[tokio::test(start_paused = true)]
async fn test_quick_view_uses_short_display() {
    let backend = reliable_backend();
    let mut quick_view = ActionController::new(
        "quick-view:sku123",
        ControllerConfig::quick_view(),
        RecordingObserver::new(),
    );
    let start = Instant::now();

    quick_view
        .trigger(start, move || backend.quick_view("sku123"))
        .unwrap();
    quick_view.run_until_idle().await.unwrap();

    assert_near(start.elapsed(), ms(300 + 1500));
    assert_eq!(
        quick_view.observer().events(),
        &[
            Observed::LoadingStarted,
            Observed::Succeeded(()),
            Observed::Settled,
            Observed::Reset
        ]
    );
}
