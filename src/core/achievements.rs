//! Achievement catalog and evaluator.
//!
//! Evaluation runs after every state change. Achievements are checked in
//! catalog order so that several unlocks caused by one action are always
//! reported in the same sequence. Unlocks are append-only.

use crate::core::state::UserStats;
use std::fmt;
use tracing::info;

/// A badge with the predicate that unlocks it
pub struct Achievement {
    /// Stable identifier stored in `unlockedAchievements`
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// What the user has to do
    pub description: &'static str,
    /// Badge icon
    pub icon: &'static str,
    /// Unlock condition
    pub condition: fn(&UserStats) -> bool,
}

impl fmt::Debug for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// All achievements, in evaluation order
pub static ACHIEVEMENTS: [Achievement; 9] = [
    Achievement {
        id: "ach_first_step",
        title: "初出茅庐",
        description: "累计获得 10 积分",
        icon: "🌱",
        condition: earned_10,
    },
    Achievement {
        id: "ach_water_king",
        title: "水牛",
        description: "单日获得 100 积分",
        icon: "🌊",
        // Checked against the lifetime total, not a single day
        condition: earned_100,
    },
    Achievement {
        id: "ach_streak_3",
        title: "坚持不懈",
        description: "连续打卡 3 天",
        icon: "🔥",
        condition: streak_3,
    },
    Achievement {
        id: "ach_streak_7",
        title: "习惯养成",
        description: "连续打卡 7 天",
        icon: "📅",
        condition: streak_7,
    },
    Achievement {
        id: "ach_streak_21",
        title: "自律达人",
        description: "连续打卡 21 天",
        icon: "👑",
        condition: streak_21,
    },
    Achievement {
        id: "ach_rich_100",
        title: "第一桶金",
        description: "累计获得 100 积分",
        icon: "💰",
        condition: earned_100,
    },
    Achievement {
        id: "ach_rich_500",
        title: "财富自由",
        description: "累计获得 500 积分",
        icon: "🏦",
        condition: earned_500,
    },
    Achievement {
        id: "ach_spend_1",
        title: "犒劳自己",
        description: "第一次消费积分",
        icon: "🎁",
        condition: spent_any,
    },
    Achievement {
        id: "ach_spend_100",
        title: "豪掷千金",
        description: "累计消费 100 元",
        icon: "💎",
        condition: spent_100,
    },
];

const fn earned_10(stats: &UserStats) -> bool {
    stats.total_points_earned >= 10
}

const fn earned_100(stats: &UserStats) -> bool {
    stats.total_points_earned >= 100
}

const fn earned_500(stats: &UserStats) -> bool {
    stats.total_points_earned >= 500
}

const fn streak_3(stats: &UserStats) -> bool {
    stats.current_streak >= 3
}

const fn streak_7(stats: &UserStats) -> bool {
    stats.current_streak >= 7
}

const fn streak_21(stats: &UserStats) -> bool {
    stats.current_streak >= 21
}

fn spent_any(stats: &UserStats) -> bool {
    stats.total_money_spent > 0.0
}

fn spent_100(stats: &UserStats) -> bool {
    stats.total_money_spent >= 100.0
}

/// Looks up an achievement by ID.
#[must_use]
pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Unlocks every achievement whose condition now holds.
///
/// Returns the newly unlocked achievements in catalog order; each one is a
/// notification for the user. Already-unlocked achievements are skipped, so
/// running this twice on the same stats unlocks nothing the second time.
pub fn evaluate(stats: &mut UserStats) -> Vec<&'static Achievement> {
    let current: &UserStats = stats;
    let unlocked: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| !current.has_unlocked(a.id) && (a.condition)(current))
        .collect();

    for achievement in &unlocked {
        info!(id = achievement.id, title = achievement.title, "Achievement unlocked");
        stats.unlocked_achievements.push(achievement.id.to_string());
    }
    unlocked
}
