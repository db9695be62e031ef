//! Combo chain and timed buffs

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;
use crate::tuning::{BuffRefresh, ComboTier};

/// Chained-pickup counter with a rolling window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Frames left before the chain breaks
    pub timer: f32,
    /// Session peak
    pub max_combo: u32,
}

impl Combo {
    /// Count a pickup and restart the window. Returns the new count.
    pub fn register_pickup(&mut self, window: f32) -> u32 {
        self.count += 1;
        self.timer = window;
        self.max_combo = self.max_combo.max(self.count);
        self.count
    }

    /// Run the window down. Returns the chain length if it broke this frame.
    pub fn update(&mut self, delta: f32) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        self.timer -= delta;
        if self.timer > 0.0 {
            return None;
        }
        let lost = self.count;
        self.max_combo = self.max_combo.max(lost);
        self.count = 0;
        self.timer = 0.0;
        Some(lost)
    }

    /// Remaining window as 0..=1 for the HUD bar
    pub fn timer_fraction(&self, window: f32) -> f32 {
        if window <= 0.0 {
            return 0.0;
        }
        (self.timer / window).clamp(0.0, 1.0)
    }
}

/// Score multiplier for a combo count (step function over the tier table)
pub fn multiplier(tiers: &[ComboTier], count: u32) -> u32 {
    tiers
        .iter()
        .rev()
        .find(|t| count >= t.at)
        .map(|t| t.multiplier.max(1))
        .unwrap_or(1)
}

/// Count at which the next tier starts, `None` at the top tier
pub fn next_threshold(tiers: &[ComboTier], count: u32) -> Option<u32> {
    tiers.iter().find(|t| t.at > count).map(|t| t.at)
}

/// Progress from the current tier to the next, 1.0 at the top tier
pub fn tier_progress(tiers: &[ComboTier], count: u32) -> f32 {
    let Some(next) = next_threshold(tiers, count) else {
        return 1.0;
    };
    let floor = tiers
        .iter()
        .rev()
        .find(|t| count >= t.at)
        .map(|t| t.at)
        .unwrap_or(0);
    let span = next.saturating_sub(floor);
    if span == 0 {
        return 1.0;
    }
    ((count - floor) as f32 / span as f32).clamp(0.0, 1.0)
}

/// A countdown that keeps a buff active while positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffTimer {
    /// Frames left
    pub remaining: f32,
}

impl BuffTimer {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Start or renew the buff
    pub fn activate(&mut self, duration: f32, policy: BuffRefresh) {
        self.remaining = match policy {
            BuffRefresh::Refresh => duration,
            BuffRefresh::Extend if self.is_active() => (self.remaining + duration).min(duration * 2.0),
            BuffRefresh::Extend => duration,
        };
    }

    /// Use the buff up immediately
    pub fn consume(&mut self) {
        self.remaining = 0.0;
    }

    /// Count down. Returns true on the frame the buff runs out.
    pub fn update(&mut self, delta: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            return true;
        }
        false
    }
}

/// The player's three independent buffs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffs {
    pub shield: BuffTimer,
    pub magnet: BuffTimer,
    pub slow: BuffTimer,
}

impl Buffs {
    pub fn get(&self, kind: PowerUpKind) -> &BuffTimer {
        match kind {
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::Magnet => &self.magnet,
            PowerUpKind::Slow => &self.slow,
        }
    }

    pub fn get_mut(&mut self, kind: PowerUpKind) -> &mut BuffTimer {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::Magnet => &mut self.magnet,
            PowerUpKind::Slow => &mut self.slow,
        }
    }

    /// Count every buff down, returning the ones that ran out this frame
    pub fn update(&mut self, delta: f32) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|&kind| self.get_mut(kind).update(delta))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn tiers() -> Vec<ComboTier> {
        Tuning::default().combo_tiers
    }

    #[test]
    fn test_multiplier_steps() {
        let t = tiers();
        assert_eq!(multiplier(&t, 0), 1);
        assert_eq!(multiplier(&t, 1), 1);
        assert_eq!(multiplier(&t, 2), 2);
        assert_eq!(multiplier(&t, 4), 2);
        assert_eq!(multiplier(&t, 5), 3);
        assert_eq!(multiplier(&t, 9), 3);
        assert_eq!(multiplier(&t, 10), 5);
        assert_eq!(multiplier(&t, 500), 5);
    }

    #[test]
    fn test_next_threshold_and_progress_at_top_tier() {
        let t = tiers();
        assert_eq!(next_threshold(&t, 3), Some(5));
        assert_eq!(next_threshold(&t, 10), None);
        assert_eq!(tier_progress(&t, 10), 1.0);
        assert_eq!(tier_progress(&[], 3), 1.0);
        assert!((tier_progress(&t, 1) - 0.5).abs() < 1e-6);
        assert!((tier_progress(&t, 7) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_combo_lapses_to_zero() {
        let mut combo = Combo::default();
        combo.register_pickup(120.0);
        combo.register_pickup(120.0);
        assert_eq!(combo.update(119.0), None);
        assert_eq!(combo.count, 2);
        assert_eq!(combo.update(1.0), Some(2));
        assert_eq!(combo.count, 0);
        assert_eq!(combo.max_combo, 2);
        assert_eq!(combo.update(1.0), None);
    }

    #[test]
    fn test_pickup_refreshes_window() {
        let mut combo = Combo::default();
        combo.register_pickup(120.0);
        combo.update(100.0);
        combo.register_pickup(120.0);
        assert_eq!(combo.timer, 120.0);
        assert_eq!(combo.update(100.0), None);
        assert_eq!(combo.count, 2);
    }

    #[test]
    fn test_timer_fraction_guarded() {
        let combo = Combo {
            count: 1,
            timer: 60.0,
            max_combo: 1,
        };
        assert!((combo.timer_fraction(120.0) - 0.5).abs() < 1e-6);
        assert_eq!(combo.timer_fraction(0.0), 0.0);
    }

    #[test]
    fn test_buff_refresh_does_not_stack() {
        let mut buff = BuffTimer::default();
        buff.activate(300.0, BuffRefresh::Refresh);
        buff.update(100.0);
        buff.activate(300.0, BuffRefresh::Refresh);
        assert_eq!(buff.remaining, 300.0);
    }

    #[test]
    fn test_buff_extend_is_capped() {
        let mut buff = BuffTimer::default();
        buff.activate(300.0, BuffRefresh::Extend);
        buff.update(50.0);
        buff.activate(300.0, BuffRefresh::Extend);
        assert_eq!(buff.remaining, 550.0);
        buff.activate(300.0, BuffRefresh::Extend);
        assert_eq!(buff.remaining, 600.0);
    }

    #[test]
    fn test_buff_expiry_reported_once() {
        let mut buffs = Buffs::default();
        buffs.magnet.activate(2.0, BuffRefresh::Refresh);
        assert!(buffs.update(1.0).is_empty());
        assert_eq!(buffs.update(1.5), vec![PowerUpKind::Magnet]);
        assert!(!buffs.magnet.is_active());
        assert!(buffs.update(1.0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_multiplier_non_decreasing(a in 0u32..200, b in 0u32..200) {
            let t = tiers();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(multiplier(&t, lo) <= multiplier(&t, hi));
        }

        #[test]
        fn prop_progress_in_unit_range(count in 0u32..200) {
            let p = tier_progress(&tiers(), count);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
