//! Viewport breakpoint monitor.
//!
//! Tracks whether the viewport is at least `controls_hidden_width` wide and
//! notifies its own subscribers when that flips. The signal never goes
//! through the store, so unrelated state changes don't re-evaluate it.
//!
//! In the browser the value comes from a `matchMedia` listener. Natively the
//! app feeds the window width each frame through [`ViewportMonitor::observe_width`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by [`ViewportMonitor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Callback = Rc<RefCell<dyn FnMut(bool)>>;

#[derive(Default)]
struct Subscribers {
    next_id: usize,
    entries: Vec<(SubscriptionId, Callback)>,
}

pub struct ViewportMonitor {
    threshold: f32,
    wide: Rc<Cell<bool>>,
    subscribers: Rc<RefCell<Subscribers>>,
    #[cfg(target_arch = "wasm32")]
    media: Option<media::MediaQueryBinding>,
}

impl ViewportMonitor {
    /// Creates a monitor whose width is reported by the caller.
    pub fn new(threshold: f32, initial_width: f32) -> Self {
        Self {
            threshold,
            wide: Rc::new(Cell::new(initial_width >= threshold)),
            subscribers: Rc::new(RefCell::new(Subscribers::default())),
            #[cfg(target_arch = "wasm32")]
            media: None,
        }
    }

    /// Creates a monitor backed by a `(min-width: ...)` media query.
    ///
    /// If the query can't be registered the monitor keeps the width seen at
    /// start-up and never updates.
    #[cfg(target_arch = "wasm32")]
    pub fn with_media_query(threshold: f32) -> Self {
        let initial_width = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0) as f32;
        let mut monitor = Self::new(threshold, initial_width);

        match media::MediaQueryBinding::register(
            threshold,
            monitor.wide.clone(),
            monitor.subscribers.clone(),
        ) {
            Ok(binding) => {
                monitor.wide.set(binding.matches());
                monitor.media = Some(binding);
            }
            Err(e) => {
                log::warn!("Viewport query unavailable, layout will not respond to resizes: {}", e);
            }
        }
        monitor
    }

    /// Whether the viewport is wide enough to dock the sidebar.
    pub fn is_wide(&self) -> bool {
        self.wide.get()
    }

    /// Reports the current viewport width.
    ///
    /// Subscribers are only notified when the breakpoint is crossed.
    pub fn observe_width(&self, width: f32) {
        #[cfg(target_arch = "wasm32")]
        if self.media.is_some() {
            return;
        }
        notify(&self.wide, &self.subscribers, width >= self.threshold);
    }

    pub fn subscribe(&self, callback: impl FnMut(bool) + 'static) -> SubscriptionId {
        let mut subscribers = self.subscribers.borrow_mut();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        subscribers.entries.push((id, callback));
        id
    }

    /// Removes a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(entry, _)| *entry != id);
        subscribers.entries.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    /// Releases the browser listener and drops all subscribers.
    pub fn detach(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            self.media = None;
        }
        self.subscribers.borrow_mut().entries.clear();
    }
}

fn notify(wide: &Cell<bool>, subscribers: &RefCell<Subscribers>, value: bool) {
    if wide.get() == value {
        return;
    }
    wide.set(value);
    log::info!("Viewport breakpoint crossed, wide = {}", value);

    // Callbacks may subscribe or unsubscribe, so the list stays in place and
    // each entry is checked again right before it runs.
    let snapshot: Vec<(SubscriptionId, Callback)> = subscribers.borrow().entries.clone();
    for (id, callback) in snapshot {
        let subscribed = subscribers.borrow().entries.iter().any(|(entry, _)| *entry == id);
        if !subscribed {
            continue;
        }
        // A callback that is already running (nested notify) is skipped.
        if let Ok(mut callback) = callback.try_borrow_mut() {
            (&mut *callback)(value);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod media {
    use super::{notify, Subscribers};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    /// A registered `change` listener on a `MediaQueryList`.
    ///
    /// Dropping the binding removes the listener.
    pub struct MediaQueryBinding {
        query: web_sys::MediaQueryList,
        listener: Closure<dyn FnMut(web_sys::MediaQueryListEvent)>,
    }

    impl MediaQueryBinding {
        pub fn register(
            threshold: f32,
            wide: Rc<Cell<bool>>,
            subscribers: Rc<RefCell<Subscribers>>,
        ) -> Result<Self, String> {
            let window = web_sys::window().ok_or("no window")?;
            let query = window
                .match_media(&format!("(min-width: {}px)", threshold))
                .map_err(|e| format!("{:?}", e))?
                .ok_or("matchMedia returned null")?;

            let listener = Closure::wrap(Box::new(move |event: web_sys::MediaQueryListEvent| {
                notify(&wide, &subscribers, event.matches());
            }) as Box<dyn FnMut(web_sys::MediaQueryListEvent)>);

            query
                .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
                .map_err(|e| format!("{:?}", e))?;

            Ok(Self { query, listener })
        }

        pub fn matches(&self) -> bool {
            self.query.matches()
        }
    }

    impl Drop for MediaQueryBinding {
        fn drop(&mut self) {
            let _ = self
                .query
                .remove_event_listener_with_callback("change", self.listener.as_ref().unchecked_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(monitor: &ViewportMonitor) -> (SubscriptionId, Rc<RefCell<Vec<bool>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = monitor.subscribe(move |wide| sink.borrow_mut().push(wide));
        (id, seen)
    }

    #[test]
    fn test_initial_value_uses_threshold() {
        assert!(ViewportMonitor::new(1000.0, 1000.0).is_wide());
        assert!(!ViewportMonitor::new(1000.0, 999.0).is_wide());
    }

    #[test]
    fn test_notifies_only_on_transitions() {
        let monitor = ViewportMonitor::new(1000.0, 1200.0);
        let (_, seen) = recorder(&monitor);

        monitor.observe_width(1300.0);
        monitor.observe_width(800.0);
        monitor.observe_width(700.0);
        monitor.observe_width(1000.0);

        assert_eq!(*seen.borrow(), vec![false, true]);
        assert!(monitor.is_wide());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let monitor = ViewportMonitor::new(1000.0, 1200.0);
        let (id, seen) = recorder(&monitor);

        assert!(monitor.unsubscribe(id));
        assert!(!monitor.unsubscribe(id));
        monitor.observe_width(500.0);

        assert!(seen.borrow().is_empty());
        assert_eq!(monitor.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribing_from_a_callback() {
        let monitor = Rc::new(ViewportMonitor::new(1000.0, 1200.0));
        let inner = monitor.clone();
        monitor.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        monitor.observe_width(500.0);

        assert_eq!(monitor.subscriber_count(), 2);
    }

    #[test]
    fn test_unsubscribing_from_a_callback() {
        let monitor = Rc::new(ViewportMonitor::new(1000.0, 1200.0));
        let later: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let removed = Rc::new(Cell::new(false));

        let inner = monitor.clone();
        let target = later.clone();
        let result = removed.clone();
        let first = monitor.subscribe(move |_| {
            if let Some(id) = target.get() {
                result.set(inner.unsubscribe(id));
            }
        });
        let (second, seen) = recorder(&monitor);
        later.set(Some(second));

        monitor.observe_width(500.0);

        assert!(removed.get());
        assert!(seen.borrow().is_empty());
        assert_eq!(monitor.subscriber_count(), 1);
        assert!(monitor.unsubscribe(first));
        assert!(!monitor.unsubscribe(second));
    }

    #[test]
    fn test_detach_drops_subscribers() {
        let mut monitor = ViewportMonitor::new(1000.0, 1200.0);
        let (_, seen) = recorder(&monitor);

        monitor.detach();
        monitor.observe_width(500.0);

        assert!(seen.borrow().is_empty());
        assert!(!monitor.is_wide());
    }
}
