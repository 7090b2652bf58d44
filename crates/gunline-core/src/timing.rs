//! Fire timing: when is the weapon allowed to shoot?
//!
//! [`FireTimingController`] is a timed state machine over [`FireState`]:
//!
//! ```text
//!            intent && ammo > 0
//!   Idle ──────────────────────────▶ Firing ──┐ next shot after
//!    ▲                                 │  ▲   │ time_between_shots
//!    │ reset timer expires             │  └───┘
//!    │                                 │ burst complete
//!   Cooldown ◀─────────────────────────┘ (reset timer still pending)
//! ```
//!
//! Two kinds of timer drive it, both living in a weapon-owned
//! [`TimerQueue`]:
//!
//! - **Next shot**: scheduled after every shot of a burst except the last.
//! - **Reset**: armed by the first shot fired while no reset is pending,
//!   `time_between_bursts` later. At most one is in flight.
//!
//! The controller never fires on its own. The weapon asks it through
//! [`poll`](FireTimingController::poll) which scheduled shots are due and
//! through [`request_fire`](FireTimingController::request_fire) whether a
//! new burst may start, then reports each shot back with
//! [`record_shot`](FireTimingController::record_shot).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::profile::WeaponProfile;
use crate::scheduler::{TimerHandle, TimerQueue};

/// Default input action that pulls the trigger.
pub const DEFAULT_FIRE_ACTION: &str = "Fire1";

// =============================================================================
// Fire intent
// =============================================================================

/// Source of the player's (or AI's) trigger input.
pub trait IntentSource {
    /// Returns `true` while the action is held down.
    fn held(&self, action: &str) -> bool;

    /// Returns `true` only on the tick the action went down.
    fn pressed(&self, action: &str) -> bool;
}

/// Trigger state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireIntent {
    /// Trigger is down
    pub held: bool,
    /// Trigger went down this tick
    pub pressed: bool,
}

impl FireIntent {
    /// Trigger untouched.
    pub const NONE: Self = Self {
        held: false,
        pressed: false,
    };

    /// Trigger pressed this tick (and therefore held).
    #[must_use]
    pub const fn press() -> Self {
        Self {
            held: true,
            pressed: true,
        }
    }

    /// Trigger held since an earlier tick.
    #[must_use]
    pub const fn hold() -> Self {
        Self {
            held: true,
            pressed: false,
        }
    }

    /// Read `action` from an input source.
    #[must_use]
    pub fn sample(source: &dyn IntentSource, action: &str) -> Self {
        Self {
            held: source.held(action),
            pressed: source.pressed(action),
        }
    }

    /// Automatic weapons fire while held; others only on the press edge.
    #[must_use]
    pub const fn satisfied(self, hold_to_fire: bool) -> bool {
        if hold_to_fire {
            self.held
        } else {
            self.pressed
        }
    }
}

impl IntentSource for FireIntent {
    fn held(&self, _action: &str) -> bool {
        self.held
    }

    fn pressed(&self, _action: &str) -> bool {
        self.pressed
    }
}

// =============================================================================
// State machine
// =============================================================================

/// Firing phase of a weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireState {
    /// Ready to start a burst
    #[default]
    Idle,
    /// Burst in progress
    Firing,
    /// Burst complete, waiting for the reset timer
    Cooldown,
}

impl fmt::Display for FireState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Firing => write!(f, "firing"),
            Self::Cooldown => write!(f, "cooldown"),
        }
    }
}

/// Answer to a request to start a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePermit {
    /// Burst started; fire the first shot now
    Granted,
    /// No intent, or the weapon is busy
    Denied,
    /// Intent while ready but the magazine is empty
    OutOfAmmo,
}

/// Timing values taken from a [`WeaponProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Spacing between shots of one burst
    pub shot_interval: Duration,
    /// Delay from arming the reset timer until the weapon is ready again
    pub burst_interval: Duration,
    /// Shots per burst, at least one
    pub bullets_per_burst: u32,
}

impl TimingConfig {
    /// Extract the timing values of a validated profile.
    #[must_use]
    pub fn from_profile(profile: &WeaponProfile) -> Self {
        Self {
            shot_interval: profile.shot_interval(),
            burst_interval: profile.burst_interval(),
            bullets_per_burst: profile.bullets_per_burst.max(1),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::from_profile(&WeaponProfile::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTask {
    NextShot,
    ResetShot,
}

/// Timed gate deciding when shots may be fired.
///
/// # Invariants
///
/// - `0 <= shots_fired_in_burst() <= bullets_per_burst`
/// - At most one reset timer and one next-shot timer are pending
/// - In `Idle` no timer is pending
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gunline_core::timing::{FirePermit, FireState, FireTimingController, TimingConfig};
///
/// let mut timing = FireTimingController::new(TimingConfig {
///     shot_interval: Duration::from_millis(100),
///     burst_interval: Duration::from_millis(400),
///     bullets_per_burst: 2,
/// });
///
/// assert_eq!(timing.request_fire(true, 10), FirePermit::Granted);
/// timing.record_shot(9);
/// assert_eq!(timing.state(), FireState::Firing);
///
/// // Second shot of the burst comes due 100ms later
/// assert_eq!(timing.poll(Duration::from_millis(150), 9), Some(Duration::from_millis(100)));
/// timing.record_shot(8);
/// assert_eq!(timing.state(), FireState::Cooldown);
///
/// assert_eq!(timing.poll(Duration::from_millis(400), 8), None);
/// assert_eq!(timing.state(), FireState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct FireTimingController {
    config: TimingConfig,
    state: FireState,
    shots_in_burst: u32,
    queue: TimerQueue<TimerTask>,
    reset_timer: Option<TimerHandle>,
    next_shot: Option<TimerHandle>,
    now: Duration,
}

impl Default for FireTimingController {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}

impl FireTimingController {
    /// Creates an idle controller at time zero.
    #[must_use]
    pub fn new(config: TimingConfig) -> Self {
        Self {
            config,
            state: FireState::Idle,
            shots_in_burst: 0,
            queue: TimerQueue::new(),
            reset_timer: None,
            next_shot: None,
            now: Duration::ZERO,
        }
    }

    /// Swap timing values. Resets to `Idle`; the clock keeps running.
    pub fn configure(&mut self, config: TimingConfig) {
        self.config = config;
        self.reset();
    }

    /// Current timing values.
    #[must_use]
    pub fn config(&self) -> TimingConfig {
        self.config
    }

    /// Current weapon clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> FireState {
        self.state
    }

    /// Shots fired so far in the current burst.
    #[must_use]
    pub fn shots_fired_in_burst(&self) -> u32 {
        self.shots_in_burst
    }

    /// Returns `true` while the reset timer is in flight.
    #[must_use]
    pub fn is_reset_pending(&self) -> bool {
        self.reset_timer.is_some_and(|h| self.queue.is_pending(h))
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.next_due()
    }

    /// Run timers due at or before `until`, in time order, and return the
    /// due time of the first scheduled shot that should fire now.
    ///
    /// The clock is left at that due time so that the shot and the timers
    /// it arms are measured from the moment it actually fired. Call again
    /// after [`record_shot`](Self::record_shot) until it returns `None`,
    /// then [`advance_to`](Self::advance_to) the end of the tick.
    pub fn poll(&mut self, until: Duration, ammo: u32) -> Option<Duration> {
        while let Some((due, handle, task)) = self.queue.pop_due(until) {
            self.now = self.now.max(due);
            match task {
                TimerTask::ResetShot => {
                    if self.reset_timer == Some(handle) {
                        self.reset_timer = None;
                    }
                    if self.state == FireState::Cooldown {
                        self.enter(FireState::Idle);
                    }
                }
                TimerTask::NextShot => {
                    if self.next_shot == Some(handle) {
                        self.next_shot = None;
                    }
                    if self.state != FireState::Firing {
                        continue;
                    }
                    if ammo == 0 {
                        self.reset();
                        continue;
                    }
                    return Some(due);
                }
            }
        }
        None
    }

    /// Move the clock forward to `until` without running timers.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Ask to start a burst now.
    ///
    /// Only an `Idle` weapon with a satisfied intent can start one. On
    /// [`FirePermit::Granted`] the caller must fire one shot immediately and
    /// report it with [`record_shot`](Self::record_shot).
    pub fn request_fire(&mut self, intent_satisfied: bool, ammo: u32) -> FirePermit {
        if !intent_satisfied || self.state != FireState::Idle {
            return FirePermit::Denied;
        }
        if ammo == 0 {
            return FirePermit::OutOfAmmo;
        }
        self.shots_in_burst = 0;
        self.enter(FireState::Firing);
        FirePermit::Granted
    }

    /// Report a shot fired at the current clock, leaving `ammo_after` rounds.
    pub fn record_shot(&mut self, ammo_after: u32) {
        if self.state != FireState::Firing {
            tracing::warn!(state = %self.state, "shot recorded outside a burst");
            return;
        }

        self.shots_in_burst += 1;
        if self.reset_timer.is_none() {
            let due = self.now + self.config.burst_interval;
            self.reset_timer = Some(self.queue.schedule_at(due, TimerTask::ResetShot));
        }

        if ammo_after == 0 {
            tracing::debug!("magazine empty");
            self.reset();
            return;
        }

        if self.shots_in_burst < self.config.bullets_per_burst {
            let due = self.now + self.config.shot_interval;
            self.next_shot = Some(self.queue.schedule_at(due, TimerTask::NextShot));
        } else {
            // The reset timer is always pending here: this shot armed it if
            // the latch was free.
            self.enter(FireState::Cooldown);
        }
    }

    /// Cancel every pending timer and return to `Idle`.
    pub fn reset(&mut self) {
        for handle in [self.next_shot.take(), self.reset_timer.take()].into_iter().flatten() {
            self.queue.cancel(handle);
        }
        self.shots_in_burst = 0;
        self.enter(FireState::Idle);
    }

    fn enter(&mut self, next: FireState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, at = ?self.now, "fire state changed");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config(shot: u64, burst: u64, bullets: u32) -> TimingConfig {
        TimingConfig {
            shot_interval: ms(shot),
            burst_interval: ms(burst),
            bullets_per_burst: bullets,
        }
    }

    /// Drive the controller the way the weapon does. Each shot is reported
    /// with `true` if it was a scheduled follow-up inside a burst.
    fn run_detailed(
        timing: &mut FireTimingController,
        ammo: &mut u32,
        dt: Duration,
        intents: &[bool],
    ) -> Vec<(Duration, bool)> {
        let mut shots = Vec::new();
        for &intent in intents {
            let until = timing.now() + dt;
            while let Some(at) = timing.poll(until, *ammo) {
                *ammo -= 1;
                shots.push((at, true));
                timing.record_shot(*ammo);
            }
            timing.advance_to(until);
            if timing.request_fire(intent, *ammo) == FirePermit::Granted {
                *ammo -= 1;
                shots.push((timing.now(), false));
                timing.record_shot(*ammo);
            }
        }
        shots
    }

    fn run(
        timing: &mut FireTimingController,
        ammo: &mut u32,
        dt: Duration,
        intents: &[bool],
    ) -> Vec<Duration> {
        run_detailed(timing, ammo, dt, intents)
            .into_iter()
            .map(|(at, _)| at)
            .collect()
    }

    mod intent {
        use super::*;

        #[test]
        fn tap_weapons_need_the_press_edge() {
            assert!(FireIntent::press().satisfied(false));
            assert!(!FireIntent::hold().satisfied(false));
            assert!(!FireIntent::NONE.satisfied(false));
        }

        #[test]
        fn automatic_weapons_fire_while_held() {
            assert!(FireIntent::press().satisfied(true));
            assert!(FireIntent::hold().satisfied(true));
            assert!(!FireIntent::NONE.satisfied(true));
        }

        #[test]
        fn sample_reads_from_source() {
            struct OnlyFire1;
            impl IntentSource for OnlyFire1 {
                fn held(&self, action: &str) -> bool {
                    action == DEFAULT_FIRE_ACTION
                }
                fn pressed(&self, _action: &str) -> bool {
                    false
                }
            }

            assert_eq!(
                FireIntent::sample(&OnlyFire1, DEFAULT_FIRE_ACTION),
                FireIntent::hold()
            );
            assert_eq!(FireIntent::sample(&OnlyFire1, "Fire2"), FireIntent::NONE);
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn starts_idle() {
            let timing = FireTimingController::default();
            assert_eq!(timing.state(), FireState::Idle);
            assert_eq!(timing.pending_timers(), 0);
            assert_eq!(timing.now(), Duration::ZERO);
        }

        #[test]
        fn denied_without_intent() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            assert_eq!(timing.request_fire(false, 10), FirePermit::Denied);
            assert_eq!(timing.state(), FireState::Idle);
        }

        #[test]
        fn out_of_ammo_in_idle() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            assert_eq!(timing.request_fire(true, 0), FirePermit::OutOfAmmo);
            assert_eq!(timing.state(), FireState::Idle);
        }

        #[test]
        fn single_shot_goes_to_cooldown_then_idle() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            assert_eq!(timing.request_fire(true, 5), FirePermit::Granted);
            timing.record_shot(4);
            assert_eq!(timing.state(), FireState::Cooldown);
            assert!(timing.is_reset_pending());

            // Busy while cooling down
            assert_eq!(timing.request_fire(true, 4), FirePermit::Denied);

            assert_eq!(timing.poll(ms(399), 4), None);
            assert_eq!(timing.state(), FireState::Cooldown);
            assert_eq!(timing.poll(ms(400), 4), None);
            assert_eq!(timing.state(), FireState::Idle);
            assert!(!timing.is_reset_pending());
        }

        #[test]
        fn burst_schedules_follow_up_shots() {
            let mut timing = FireTimingController::new(config(100, 1000, 3));
            timing.request_fire(true, 10);
            timing.record_shot(9);
            assert_eq!(timing.shots_fired_in_burst(), 1);
            assert_eq!(timing.next_due(), Some(ms(100)));

            assert_eq!(timing.poll(ms(250), 9), Some(ms(100)));
            assert_eq!(timing.now(), ms(100));
            timing.record_shot(8);
            assert_eq!(timing.poll(ms(250), 8), Some(ms(200)));
            timing.record_shot(7);

            assert_eq!(timing.shots_fired_in_burst(), 3);
            assert_eq!(timing.state(), FireState::Cooldown);
            assert_eq!(timing.poll(ms(250), 7), None);
        }

        #[test]
        fn reset_expiring_mid_burst_is_rearmed() {
            // Reset expires mid-burst and the next shot re-arms it
            let mut timing = FireTimingController::new(config(100, 150, 3));
            let mut ammo = 10;
            let shots = run(&mut timing, &mut ammo, ms(50), &[true]);
            assert_eq!(shots, vec![ms(50)]);

            let shots = run(&mut timing, &mut ammo, ms(50), &[false; 4]);
            assert_eq!(shots, vec![ms(150), ms(250)]);
            assert!(timing.is_reset_pending());
            assert_eq!(timing.state(), FireState::Cooldown);
        }

        #[test]
        fn empty_magazine_resets_mid_burst() {
            let mut timing = FireTimingController::new(config(100, 400, 3));
            timing.request_fire(true, 1);
            timing.record_shot(0);
            assert_eq!(timing.state(), FireState::Idle);
            assert_eq!(timing.pending_timers(), 0);
            assert_eq!(timing.shots_fired_in_burst(), 0);
        }

        #[test]
        fn scheduled_shot_with_no_ammo_resets() {
            let mut timing = FireTimingController::new(config(100, 400, 3));
            timing.request_fire(true, 5);
            timing.record_shot(4);

            // Ammo drained externally before the next shot came due
            assert_eq!(timing.poll(ms(100), 0), None);
            assert_eq!(timing.state(), FireState::Idle);
            assert_eq!(timing.pending_timers(), 0);
        }

        #[test]
        fn reset_cancels_everything() {
            let mut timing = FireTimingController::new(config(100, 400, 3));
            timing.request_fire(true, 5);
            timing.record_shot(4);
            assert_eq!(timing.pending_timers(), 2);

            timing.reset();
            assert_eq!(timing.state(), FireState::Idle);
            assert_eq!(timing.pending_timers(), 0);
            assert_eq!(timing.poll(ms(1000), 4), None);
        }

        #[test]
        fn reset_mid_cooldown_cancels_reset_timer() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            timing.request_fire(true, 5);
            timing.record_shot(4);
            assert_eq!(timing.state(), FireState::Cooldown);
            assert!(timing.is_reset_pending());

            timing.reset();
            assert!(!timing.is_reset_pending());
            assert_eq!(timing.next_due(), None);

            // A fresh burst arms a fresh latch measured from its own shot
            timing.advance_to(ms(50));
            assert_eq!(timing.request_fire(true, 4), FirePermit::Granted);
            timing.record_shot(3);
            assert_eq!(timing.next_due(), Some(ms(450)));
        }

        #[test]
        fn configure_resets_but_keeps_clock() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            timing.advance_to(ms(30));
            timing.request_fire(true, 5);
            timing.record_shot(4);

            timing.configure(config(50, 100, 2));
            assert_eq!(timing.state(), FireState::Idle);
            assert_eq!(timing.now(), ms(30));
            assert_eq!(timing.config().bullets_per_burst, 2);
        }

        #[test]
        fn record_outside_burst_is_ignored() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            timing.record_shot(3);
            assert_eq!(timing.state(), FireState::Idle);
            assert_eq!(timing.pending_timers(), 0);
        }

        #[test]
        fn clock_never_runs_backwards() {
            let mut timing = FireTimingController::new(config(100, 400, 1));
            timing.advance_to(ms(500));
            timing.advance_to(ms(100));
            assert_eq!(timing.now(), ms(500));
        }

        #[test]
        fn timing_config_from_profile() {
            let profile = WeaponProfile {
                time_between_shots: 0.1,
                time_between_bursts: 0.5,
                bullets_per_burst: 3,
                ..WeaponProfile::default()
            };
            assert_eq!(TimingConfig::from_profile(&profile), config(100, 500, 3));
        }
    }

    mod cadence {
        use super::*;

        #[test]
        fn three_round_burst_from_one_press() {
            let mut timing = FireTimingController::new(config(100, 500, 3));
            let mut ammo = 30;
            let mut intents = vec![true];
            intents.extend([false; 20]);

            let shots = run(&mut timing, &mut ammo, ms(10), &intents);
            assert_eq!(shots, vec![ms(10), ms(110), ms(210)]);
            assert_eq!(ammo, 27);
        }

        #[test]
        fn shots_land_on_due_time_not_tick_boundary() {
            let mut timing = FireTimingController::new(config(100, 500, 2));
            let mut ammo = 30;
            let shots = run(&mut timing, &mut ammo, ms(30), &[true, false, false, false, false]);
            assert_eq!(shots, vec![ms(30), ms(130)]);
        }

        #[test]
        fn held_intent_fires_until_empty() {
            let mut timing = FireTimingController::new(config(50, 100, 1));
            let mut ammo = 4;
            let shots = run(&mut timing, &mut ammo, ms(50), &[true; 20]);
            assert_eq!(shots, vec![ms(50), ms(150), ms(250), ms(350)]);
            assert_eq!(ammo, 0);
            assert_eq!(timing.request_fire(true, ammo), FirePermit::OutOfAmmo);
        }
    }

    proptest! {
        #[test]
        fn shots_in_a_burst_are_spaced(
            shot in 10u64..200,
            burst in 10u64..600,
            bullets in 1u32..6,
            dt in 1u64..80,
            intents in proptest::collection::vec(any::<bool>(), 1..80),
        ) {
            let mut timing = FireTimingController::new(config(shot, burst, bullets));
            let mut ammo = 1000;
            let shots = run_detailed(&mut timing, &mut ammo, ms(dt), &intents);

            for pair in shots.windows(2) {
                let ((prev, _), (next, follow_up)) = (pair[0], pair[1]);
                prop_assert!(next > prev);
                if follow_up {
                    prop_assert_eq!(next, prev + ms(shot));
                }
            }
            prop_assert!(timing.shots_fired_in_burst() <= bullets);
            prop_assert_eq!(1000 - ammo, u32::try_from(shots.len()).unwrap());
        }

        #[test]
        fn ammo_never_underflows(
            start in 0u32..6,
            bullets in 1u32..5,
            intents in proptest::collection::vec(any::<bool>(), 1..60),
        ) {
            let mut timing = FireTimingController::new(config(20, 40, bullets));
            let mut ammo = start;
            let shots = run(&mut timing, &mut ammo, ms(10), &intents);
            prop_assert!(shots.len() <= start as usize);
            if ammo == 0 {
                prop_assert_eq!(timing.state(), FireState::Idle);
            }
        }
    }
}
