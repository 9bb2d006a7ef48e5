//! The cooperative main loop and the state it owns.
//!
//! One [`App::tick`] does at most one of:
//!
//! 1. show the oldest queued notification,
//! 2. act on a completed button interaction,
//! 3. return from an expired transient screen to `Home`.
//!
//! Notifications win over button interactions; a deferred interaction stays
//! in the classifier and edge latch and is serviced on a later tick.

use crate::config::SCREEN_HOLD_MS;
use crate::dispatch::Dispatcher;
use crate::input::{
    elapsed, ButtonLine, Classifier, ClassifierState, Clock, EdgeLatch, Intent, Timing,
};
use crate::notify::{NotificationDrain, Transport};
use crate::screen::{Renderer, ScreenState};
use crate::service::{CountingService, Request};

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    Notification,
    Interaction(Intent),
    Restored,
    Idle,
}

pub struct App<'a, S, T, D> {
    latch: &'a EdgeLatch,
    classifier: Classifier,
    dispatcher: Dispatcher<S>,
    drain: NotificationDrain<T>,
    renderer: D,
    screen: ScreenState,
    /// Latest known home screen.
    home: Option<ScreenState>,
    shown_at: u32,
    hold_ms: u32,
}

impl<'a, S, T, D> App<'a, S, T, D>
where
    S: CountingService,
    T: Transport,
    D: Renderer,
{
    pub fn new(latch: &'a EdgeLatch, service: S, transport: T, renderer: D) -> Self {
        Self {
            latch,
            classifier: Classifier::default(),
            dispatcher: Dispatcher::new(service),
            drain: NotificationDrain::new(transport),
            renderer,
            screen: ScreenState::Welcome,
            home: None,
            shown_at: 0,
            hold_ms: SCREEN_HOLD_MS,
        }
    }

    /// Replace the classifier thresholds. The latch keeps its own debounce.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.classifier = Classifier::new(timing);
        self
    }

    pub fn with_hold_ms(mut self, hold_ms: u32) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    /// Draw the welcome screen and fetch the first stats.
    pub async fn start<C: Clock>(&mut self, clock: &C) {
        self.renderer.render(&ScreenState::Welcome);
        self.screen = ScreenState::Welcome;
        self.shown_at = clock.now_ms();
        self.home = self.dispatcher.refresh_home().await;
    }

    pub async fn tick<C: Clock, L: ButtonLine>(&mut self, clock: &C, line: &mut L) -> Tick {
        let now = clock.now_ms();
        self.drain.poll_transport();

        let held = self.is_held(now);
        if !held {
            if let Some(screen) = self.drain.drain_one() {
                self.show(screen, now);
                return Tick::Notification;
            }
        }

        if let Some(intent) = self.classifier.step(now, line.is_pressed(), self.latch) {
            let request = Request::from(intent);
            info!("{} -> {}", intent, request);

            self.show(ScreenState::Sending { request }, now);
            let outcome = self.dispatcher.dispatch(request).await;
            if outcome.home.is_some() {
                self.home = outcome.home;
            }
            self.show(outcome.screen, clock.now_ms());
            return Tick::Interaction(intent);
        }

        if self.screen.is_transient() && !held {
            if let Some(home) = self.home.clone() {
                self.show(home, now);
                return Tick::Restored;
            }
        }

        Tick::Idle
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn home(&self) -> Option<&ScreenState> {
        self.home.as_ref()
    }

    pub fn classifier_state(&self) -> ClassifierState {
        self.classifier.state()
    }

    pub fn pending_notifications(&self) -> usize {
        self.drain.pending()
    }

    pub fn renderer(&self) -> &D {
        &self.renderer
    }

    pub fn service(&mut self) -> &mut S {
        self.dispatcher.service()
    }

    pub fn transport(&mut self) -> &mut T {
        self.drain.transport_mut()
    }

    fn is_held(&self, now: u32) -> bool {
        self.screen.is_transient() && elapsed(now, self.shown_at) < self.hold_ms
    }

    /// Make `screen` current; the renderer only hears about changes.
    fn show(&mut self, screen: ScreenState, now: u32) {
        if screen != self.screen {
            debug!("screen: {}", screen);
            self.renderer.render(&screen);
        }
        self.screen = screen;
        self.shown_at = now;
    }
}
