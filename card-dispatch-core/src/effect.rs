//! Effect-emitting store
//!
//! Reducers stay pure: they mutate state and describe side effects as
//! values. The event loop takes the returned effects and runs them, usually
//! by triggering a controller.
//!
//! ```ignore
//! fn reducer(state: &mut CardState, msg: CardMsg) -> DispatchResult<CardEffect> {
//!     match msg {
//!         CardMsg::AddToCart => DispatchResult::effect(CardEffect::AddToCart),
//!         CardMsg::DidAddToCart(count) => {
//!             state.cart_count = count;
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//!
//! let mut store = EffectStore::new(CardState::default(), reducer);
//! for effect in store.dispatch(CardMsg::AddToCart).effects {
//!     // trigger the add-to-cart controller
//! }
//! ```

use std::marker::PhantomData;

use crate::action::Action;
use crate::store::Middleware;

/// What a dispatch produced: whether to re-render, and effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    pub changed: bool,
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: Vec::new(),
        }
    }

    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: Vec::new(),
        }
    }

    /// One effect, state untouched.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self::unchanged().with(effect)
    }

    /// State changed and one effect to run.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self::changed().with(effect)
    }

    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    #[inline]
    pub fn mark_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// State plus an effect reducer.
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A: Action, E> EffectStore<S, A, E> {
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Direct access for setup; prefer dispatching.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    #[inline]
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }
}

impl<S: std::fmt::Debug, A, E> std::fmt::Debug for EffectStore<S, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// An [`EffectStore`] whose dispatches pass through a [`Middleware`].
pub struct EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    #[inline]
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }

    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware.after(&action, result.changed);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum CartMsg {
        Add,
        DidAdd(u32),
        DidFail,
        Hover,
    }

    impl Action for CartMsg {
        fn name(&self) -> &'static str {
            match self {
                CartMsg::Add => "Add",
                CartMsg::DidAdd(_) => "DidAdd",
                CartMsg::DidFail => "DidFail",
                CartMsg::Hover => "Hover",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CartEffect {
        Request,
        Announce(String),
    }

    #[derive(Debug, Default)]
    struct Cart {
        busy: bool,
        count: u32,
    }

    fn reducer(cart: &mut Cart, msg: CartMsg) -> DispatchResult<CartEffect> {
        match msg {
            CartMsg::Add if cart.busy => DispatchResult::unchanged(),
            CartMsg::Add => {
                cart.busy = true;
                DispatchResult::changed_with(CartEffect::Request)
                    .with(CartEffect::Announce("Adding item to cart...".into()))
            }
            CartMsg::DidAdd(count) => {
                cart.busy = false;
                cart.count = count;
                DispatchResult::changed()
            }
            CartMsg::DidFail => {
                cart.busy = false;
                DispatchResult::effect(CartEffect::Announce("failed".into())).mark_changed()
            }
            CartMsg::Hover => DispatchResult::unchanged(),
        }
    }

    #[test]
    fn test_dispatch_result_builders() {
        let r: DispatchResult<CartEffect> = DispatchResult::default();
        assert!(!r.changed && !r.has_effects());

        let r = DispatchResult::effect(CartEffect::Request);
        assert!(!r.changed);
        assert_eq!(r.effects, vec![CartEffect::Request]);

        let r = DispatchResult::changed_with(CartEffect::Request).with(CartEffect::Request);
        assert!(r.changed);
        assert_eq!(r.effects.len(), 2);
    }

    #[test]
    fn test_effect_store_round() {
        let mut store = EffectStore::new(Cart::default(), reducer);

        let result = store.dispatch(CartMsg::Add);
        assert!(result.changed);
        assert_eq!(result.effects[0], CartEffect::Request);
        assert!(store.state().busy);

        // Busy cart ignores another press
        assert_eq!(store.dispatch(CartMsg::Add), DispatchResult::unchanged());

        assert!(store.dispatch(CartMsg::DidAdd(3)).changed);
        assert_eq!(store.state().count, 3);
        assert!(!store.state().busy);
    }

    #[test]
    fn test_effect_store_state_mut() {
        let mut store = EffectStore::new(Cart::default(), reducer);
        store.state_mut().count = 9;
        assert_eq!(store.state().count, 9);
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(&'static str, bool)>,
    }

    impl Middleware<CartMsg> for Recorder {
        fn before(&mut self, _action: &CartMsg) {}

        fn after(&mut self, action: &CartMsg, state_changed: bool) {
            self.seen.push((action.name(), state_changed));
        }
    }

    #[test]
    fn test_middleware_sees_every_dispatch() {
        let mut store = EffectStoreWithMiddleware::new(Cart::default(), reducer, Recorder::default());

        store.dispatch(CartMsg::Add);
        store.dispatch(CartMsg::Hover);
        let result = store.dispatch(CartMsg::DidFail);

        assert!(result.changed);
        assert_eq!(
            store.middleware().seen,
            vec![("Add", true), ("Hover", false), ("DidFail", true)]
        );
        assert!(!store.state().busy);
    }
}
