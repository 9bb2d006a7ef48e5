//! Integration tests for the teacounter main loop.
//!
//! The app runs against fake collaborators on a simulated millisecond clock:
//! press edges are latched at their own timestamps (as the interrupt would,
//! even while a dispatch is in flight) and the loop ticks every 10 ms.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_futures::block_on;
use teacounter::config::DEBOUNCE_MS;
use teacounter::input::{ButtonLine, ClassifierState, Clock, EdgeLatch, Intent, RawEdge, Timing};
use teacounter::notify::{RawNotification, Transport};
use teacounter::screen::{self, Renderer, ScreenState};
use teacounter::service::{CountingService, Drink, Reply, Request, Stats};
use teacounter::{App, Error, Tick};

const TICK_MS: u32 = 10;

// ─── Fakes ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    fn advance(&self, ms: u32) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

/// Button that is down during the given `(press, release)` intervals.
struct SimLine {
    clock: SimClock,
    held: Vec<(u32, u32)>,
}

impl ButtonLine for SimLine {
    fn is_pressed(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.held.iter().any(|&(down, up)| now >= down && now < up)
    }
}

/// A well-behaved counting server with optional latency and failures.
struct FakeServer {
    clock: SimClock,
    latency_ms: u32,
    drinks: Vec<Drink>,
    fail_next: Option<Error>,
    fail_stats: bool,
    calls: Vec<String>,
}

impl FakeServer {
    fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            latency_ms: 0,
            drinks: Vec::new(),
            fail_next: None,
            fail_stats: false,
            calls: Vec::new(),
        }
    }

    fn round_trip(&mut self, call: String) -> teacounter::Result<()> {
        self.calls.push(call);
        self.clock.advance(self.latency_ms);
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl CountingService for FakeServer {
    async fn register(&mut self, drink: Drink) -> teacounter::Result<Reply> {
        self.round_trip(format!("register {}", drink.as_str()))?;
        self.drinks.push(drink);
        Ok(Reply {
            success: true,
            message: screen::format(format_args!("{} registered!", drink.as_str())),
        })
    }

    async fn undo(&mut self) -> teacounter::Result<Reply> {
        self.round_trip("undo".to_string())?;
        Ok(match self.drinks.pop() {
            Some(drink) => Reply {
                success: true,
                message: screen::format(format_args!(
                    "Successfully undid last {}",
                    drink.as_str()
                )),
            },
            None => Reply {
                success: false,
                message: screen::text("No drinks to undo"),
            },
        })
    }

    async fn stats(&mut self) -> teacounter::Result<Stats> {
        self.calls.push("stats".to_string());
        if self.fail_stats {
            return Err(Error::Network);
        }
        let tea = self.drinks.iter().filter(|d| **d == Drink::Tea).count() as u32;
        let coffee = self.drinks.len() as u32 - tea;
        Ok(Stats { tea, coffee })
    }
}

#[derive(Default)]
struct FakeBroker {
    inbox: VecDeque<RawNotification>,
}

impl FakeBroker {
    fn publish(&mut self, kind: &str, message: &str) {
        let payload = format!(
            r#"{{"type":"{}","message":"{}","timestamp":"2025-06-01T12:00:00+00:00"}}"#,
            kind, message
        );
        self.inbox
            .push_back(RawNotification::from_slice(payload.as_bytes()).unwrap());
    }
}

impl Transport for FakeBroker {
    fn poll(&mut self) -> Option<RawNotification> {
        self.inbox.pop_front()
    }
}

#[derive(Default)]
struct FakeDisplay {
    frames: Vec<ScreenState>,
}

impl Renderer for FakeDisplay {
    fn render(&mut self, state: &ScreenState) {
        self.frames.push(state.clone());
    }
}

type TestApp<'a> = App<'a, FakeServer, FakeBroker, FakeDisplay>;

// ─── Harness ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Script {
    /// Press edges seen by the interrupt.
    edges: Vec<u32>,
    /// `(time, type, message)` published by the broker.
    notes: Vec<(u32, &'static str, String)>,
}

impl Script {
    /// Clean presses: one edge per press start.
    fn presses(held: &[(u32, u32)]) -> Self {
        Self {
            edges: held.iter().map(|&(down, _)| down).collect(),
            notes: Vec::new(),
        }
    }
}

struct Rig {
    clock: SimClock,
    line: SimLine,
}

impl Rig {
    fn new(held: &[(u32, u32)]) -> Self {
        let clock = SimClock::default();
        let line = SimLine {
            clock: clock.clone(),
            held: held.to_vec(),
        };
        Self { clock, line }
    }

    fn app<'a>(&self, latch: &'a EdgeLatch) -> TestApp<'a> {
        App::new(
            latch,
            FakeServer::new(&self.clock),
            FakeBroker::default(),
            FakeDisplay::default(),
        )
    }

    /// Tick the app until `until` ms, returning every non-idle tick.
    fn run(
        &mut self,
        app: &mut TestApp<'_>,
        latch: &EdgeLatch,
        script: &Script,
        until: u32,
    ) -> Vec<(u32, Tick)> {
        let mut edges = script.edges.iter().peekable();
        let mut notes = script.notes.iter().peekable();
        let mut ticks = Vec::new();

        while self.clock.now_ms() <= until {
            let now = self.clock.now_ms();
            while let Some(&&edge) = edges.peek() {
                if edge > now {
                    break;
                }
                latch.capture(RawEdge::press(edge));
                edges.next();
            }
            while let Some((at, kind, message)) = notes.peek() {
                if *at > now {
                    break;
                }
                app.transport().publish(kind, message);
                notes.next();
            }

            let tick = block_on(app.tick(&self.clock, &mut self.line));
            if tick != Tick::Idle {
                ticks.push((now, tick));
            }
            self.clock.advance(TICK_MS);
        }
        ticks
    }
}

fn home(teas: u32, coffees: u32) -> ScreenState {
    ScreenState::Home { teas, coffees }
}

fn sending(request: Request) -> ScreenState {
    ScreenState::Sending { request }
}

fn result(text: &str) -> ScreenState {
    ScreenState::Result {
        ok: true,
        text: screen::text(text),
    }
}

fn error(text: &str) -> ScreenState {
    ScreenState::ErrorMsg {
        text: screen::text(text),
    }
}

fn info(text: &str) -> ScreenState {
    ScreenState::Info {
        text: screen::text(text),
    }
}

// ─── Start-up ─────────────────────────────────────────────────────────────

#[test]
fn startup_shows_welcome_then_home() {
    let mut rig = Rig::new(&[]);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);

    block_on(app.start(&rig.clock));
    assert_eq!(app.screen(), &ScreenState::Welcome);
    assert_eq!(app.home(), Some(&home(0, 0)));

    let ticks = rig.run(&mut app, &latch, &Script::default(), 3000);
    assert_eq!(ticks, vec![(2000, Tick::Restored)]);
    assert_eq!(app.renderer().frames, vec![ScreenState::Welcome, home(0, 0)]);
}

#[test]
fn startup_without_stats_stays_on_welcome() {
    let mut rig = Rig::new(&[]);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    app.service().fail_stats = true;

    block_on(app.start(&rig.clock));
    let ticks = rig.run(&mut app, &latch, &Script::default(), 5000);
    assert!(ticks.is_empty());
    assert_eq!(app.screen(), &ScreenState::Welcome);
}

// ─── Button interactions ──────────────────────────────────────────────────

#[test]
fn tap_registers_tea() {
    let held = [(3000, 3030)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let ticks = rig.run(&mut app, &latch, &Script::presses(&held), 6000);
    assert_eq!(
        ticks,
        vec![
            (2000, Tick::Restored),
            (3530, Tick::Interaction(Intent::Tap)),
            (5530, Tick::Restored),
        ]
    );
    assert_eq!(
        app.renderer().frames,
        vec![
            ScreenState::Welcome,
            home(0, 0),
            sending(Request::Register(Drink::Tea)),
            result("tea registered!"),
            home(1, 0),
        ]
    );
    assert_eq!(app.service().calls, ["stats", "register tea", "stats"]);
}

#[test]
fn double_tap_registers_coffee() {
    let held = [(3000, 3030), (3200, 3230)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let ticks = rig.run(&mut app, &latch, &Script::presses(&held), 6000);
    assert_eq!(ticks[1], (3200, Tick::Interaction(Intent::DoubleTap)));
    assert_eq!(ticks.len(), 3);
    assert_eq!(app.screen(), &home(0, 1));
    assert_eq!(
        app.service().calls,
        ["stats", "register coffee", "stats"]
    );
}

#[test]
fn long_press_undoes_last_drink() {
    // Tap for tea, then hold for undo.
    let held = [(3000, 3030), (7000, 8500)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let ticks = rig.run(&mut app, &latch, &Script::presses(&held), 11_000);
    assert!(ticks.contains(&(8000, Tick::Interaction(Intent::LongPress))));
    assert!(app
        .renderer()
        .frames
        .contains(&result("Successfully undid last tea")));
    assert_eq!(app.screen(), &home(0, 0));
    assert_eq!(app.classifier_state(), ClassifierState::Idle);
}

#[test]
fn rejected_undo_shows_sticky_error() {
    let held = [(3000, 4200)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let ticks = rig.run(&mut app, &latch, &Script::presses(&held), 10_000);
    assert_eq!(
        ticks,
        vec![
            (2000, Tick::Restored),
            (4000, Tick::Interaction(Intent::LongPress)),
        ]
    );
    assert_eq!(app.screen(), &error("Failed: No drinks to undo"));
    assert_eq!(app.service().calls, ["stats", "undo"]);
}

#[test]
fn network_failure_is_one_error_no_retry() {
    let held = [(3000, 3030)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));
    app.service().fail_next = Some(Error::Network);

    rig.run(&mut app, &latch, &Script::presses(&held), 8000);
    assert_eq!(app.screen(), &error("Error: network unreachable"));
    assert_eq!(app.service().calls, ["stats", "register tea"]);
    // Failed dispatch leaves the last home in place.
    assert_eq!(app.home(), Some(&home(0, 0)));
}

#[test]
fn error_is_replaced_by_notification_then_home() {
    let held = [(3000, 3030)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));
    app.service().fail_next = Some(Error::Timeout);

    let mut script = Script::presses(&held);
    script.notes.push((5000, "message", "Kettle is on".to_string()));

    let ticks = rig.run(&mut app, &latch, &script, 8000);
    assert_eq!(
        ticks[1..],
        [
            (3530, Tick::Interaction(Intent::Tap)),
            (5000, Tick::Notification),
            (7000, Tick::Restored),
        ]
    );
    let frames = &app.renderer().frames;
    assert_eq!(
        frames[frames.len() - 3..],
        [error("Error: timed out"), info("Kettle is on"), home(0, 0)]
    );
}

#[test]
fn press_during_slow_dispatch_is_not_lost() {
    // The first tap's dispatch blocks the loop from 3530 to 3830; the second
    // press happens in the middle of it.
    let held = [(3000, 3030), (3700, 3730)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));
    app.service().latency_ms = 300;

    rig.run(&mut app, &latch, &Script::presses(&held), 8000);
    assert_eq!(
        app.service().calls,
        ["stats", "register tea", "stats", "register tea", "stats"]
    );
    assert_eq!(app.home(), Some(&home(2, 0)));
}

#[test]
fn press_during_slow_undo_is_not_lost() {
    // The long press fires at 4000 and the undo blocks the loop until 5500.
    // The button is released at 4100 and tapped again at 4500.
    let held = [(3000, 4100), (4500, 4530)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));
    app.service().latency_ms = 1500;

    rig.run(&mut app, &latch, &Script::presses(&held), 10_000);
    assert_eq!(
        app.service().calls,
        ["stats", "undo", "register tea", "stats"]
    );
    assert_eq!(app.home(), Some(&home(1, 0)));
}

#[test]
fn press_during_slow_coffee_is_not_lost() {
    // The double tap at 3200 blocks the loop until 4200; the tap at 3600
    // happens in the middle of it.
    let held = [(3000, 3030), (3200, 3230), (3600, 3630)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));
    app.service().latency_ms = 1000;

    rig.run(&mut app, &latch, &Script::presses(&held), 9000);
    assert_eq!(
        app.service().calls,
        ["stats", "register coffee", "stats", "register tea", "stats"]
    );
    assert_eq!(app.home(), Some(&home(1, 1)));
}

#[test]
fn bouncy_press_counts_once() {
    let held = [(3000, 3300)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let script = Script {
        edges: vec![3000, 3001, 3004, 3009, 3302, 3305],
        notes: Vec::new(),
    };
    rig.run(&mut app, &latch, &script, 7000);
    assert_eq!(app.service().calls, ["stats", "register tea", "stats"]);
}

#[test]
fn custom_timing_applies_to_app() {
    let held = [(3000, 3400)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch).with_timing(Timing {
        debounce_ms: DEBOUNCE_MS,
        long_press_ms: 300,
        double_click_window_ms: 200,
    });
    block_on(app.start(&rig.clock));

    let ticks = rig.run(&mut app, &latch, &Script::presses(&held), 6000);
    assert!(ticks.contains(&(3300, Tick::Interaction(Intent::LongPress))));
}

// ─── Notifications ────────────────────────────────────────────────────────

#[test]
fn notification_takes_priority_over_completed_tap() {
    // The tap completes at 3530, the same tick a notification arrives.
    let held = [(3000, 3030)];
    let mut rig = Rig::new(&held);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let mut script = Script::presses(&held);
    script.notes.push((3530, "message", "Tea break at 3".to_string()));

    let ticks = rig.run(&mut app, &latch, &script, 4000);
    assert_eq!(
        ticks[1..],
        [
            (3530, Tick::Notification),
            (3540, Tick::Interaction(Intent::Tap)),
        ]
    );
    assert_eq!(app.service().calls, ["stats", "register tea", "stats"]);
}

#[test]
fn notification_burst_is_shown_one_at_a_time() {
    let mut rig = Rig::new(&[]);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let script = Script {
        edges: Vec::new(),
        notes: vec![
            (3000, "message", "one".to_string()),
            (3000, "celebration", "two".to_string()),
            (3000, "message", "three".to_string()),
        ],
    };
    let ticks = rig.run(&mut app, &latch, &script, 10_000);
    assert_eq!(
        ticks,
        vec![
            (2000, Tick::Restored),
            (3000, Tick::Notification),
            (5000, Tick::Notification),
            (7000, Tick::Notification),
            (9000, Tick::Restored),
        ]
    );
    assert_eq!(
        app.renderer().frames[2..],
        [
            info("one"),
            ScreenState::Celebration {
                text: screen::text("two")
            },
            info("three"),
            home(0, 0),
        ]
    );
}

#[test]
fn twenty_notifications_keep_the_last_sixteen() {
    let mut rig = Rig::new(&[]);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    // All arrive while the welcome screen is held.
    let script = Script {
        edges: Vec::new(),
        notes: (0..20)
            .map(|i| (0, "message", format!("note {}", i)))
            .collect(),
    };
    rig.run(&mut app, &latch, &script, 1000);
    assert_eq!(app.pending_notifications(), 16);

    rig.run(&mut app, &latch, &Script::default(), 40_000);
    let shown: Vec<ScreenState> = app
        .renderer()
        .frames
        .iter()
        .filter(|f| matches!(f, ScreenState::Info { .. }))
        .cloned()
        .collect();
    let expected: Vec<ScreenState> = (4..20).map(|i| info(&format!("note {}", i))).collect();
    assert_eq!(shown, expected);
    assert_eq!(app.screen(), &home(0, 0));
}

#[test]
fn malformed_notifications_are_ignored() {
    let mut rig = Rig::new(&[]);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let script = Script {
        edges: Vec::new(),
        notes: vec![(3000, "alarm", "wake up".to_string())],
    };
    let ticks = rig.run(&mut app, &latch, &script, 4000);
    assert_eq!(ticks, vec![(2000, Tick::Restored)]);
    assert_eq!(app.pending_notifications(), 0);
}

#[test]
fn unchanged_screen_is_not_redrawn() {
    let mut rig = Rig::new(&[]);
    let latch = EdgeLatch::new(DEBOUNCE_MS);
    let mut app = rig.app(&latch);
    block_on(app.start(&rig.clock));

    let script = Script {
        edges: Vec::new(),
        notes: vec![
            (3000, "message", "same".to_string()),
            (3000, "message", "same".to_string()),
        ],
    };
    let ticks = rig.run(&mut app, &latch, &script, 8000);
    assert_eq!(
        ticks[1..],
        [
            (3000, Tick::Notification),
            (5000, Tick::Notification),
            (7000, Tick::Restored),
        ]
    );
    assert_eq!(
        app.renderer().frames,
        vec![ScreenState::Welcome, home(0, 0), info("same"), home(0, 0)]
    );
}
