//! Task Catalog - the predefined task definitions shipped with the tracker.
//!
//! The catalog is authoritative for the definition fields of every preset
//! (text, value, type, target). Stored progress is reconciled against it on
//! load, so editing a preset here updates it for existing users too.

use serde::{Deserialize, Serialize};

/// Pastel palette used for task cards
pub const PALETTE: [&str; 10] = [
    "#F4E3E3", // dusty pink
    "#E3E9E4", // sage green
    "#E3EBF4", // soft blue
    "#FDF8E4", // cream yellow
    "#ECE3F4", // lavender
    "#E8E8E8", // mist gray
    "#F4E8E3", // peach
    "#E0F2F1", // soft teal
    "#E8E8E8", // soft indigo
    "#FFF3E0", // soft orange
];

/// How a task is completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Done once per day
    #[default]
    Boolean,
    /// Repeatable; complete once the target count is reached
    Counter,
}

/// Definition of a preset task, without any progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetTask {
    /// Stable identifier (`t1`, `t2`, ...)
    pub id: String,
    /// Display text
    pub text: String,
    /// Points awarded per increment
    pub value: i64,
    /// Card icon
    pub emoji: String,
    /// Card background colour
    pub color: String,
    /// Completion mode
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    /// Count at which the task counts as completed
    #[serde(default = "default_target_count")]
    pub target_count: u32,
}

const fn default_target_count() -> u32 {
    1
}

/// The full set of presets known to this build (or loaded from `config.toml`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    presets: Vec<PresetTask>,
}

impl Catalog {
    /// Wraps an explicit preset list, e.g. one read from configuration.
    #[must_use]
    pub const fn new(presets: Vec<PresetTask>) -> Self {
        Self { presets }
    }

    /// The presets compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            preset("t1", "比前一天更瘦", 10, "💃", "#F8E1E1", TaskType::Boolean, 1),
            // Counters
            preset("t2", "动起来 (30分)", 5, "🧘‍♀️", "#E1EFE6", TaskType::Counter, 1),
            preset("t3", "专注时刻 (25分)", 5, "🧠", "#DEECF9", TaskType::Counter, 4),
            preset("t10", "喝水达人 (250ml)", 2, "💧", "#E1F5FE", TaskType::Counter, 8),
            preset("t8", "阅读输入 (30分)", 3, "📖", "#E0F2F1", TaskType::Counter, 1),
            // Booleans
            preset("t4", "全天无奶茶", 3, "🥤", "#EFEBE9", TaskType::Boolean, 1),
            preset("t5", "全天无夜宵", 3, "🌙", "#EDE7F6", TaskType::Boolean, 1),
            preset("t6", "全天无炸物", 3, "🍟", "#FFF9C4", TaskType::Boolean, 1),
            preset("t7", "早睡挑战 (23:30)", 3, "😴", "#E8EAF6", TaskType::Boolean, 1),
            preset("t9", "早起打卡 (09:30)", 2, "🌅", "#FFF3E0", TaskType::Boolean, 1),
            preset("t11", "记账打卡", 2, "📒", "#F5F5F5", TaskType::Boolean, 1),
            preset("t12", "写三件好事", 2, "✨", "#FCE4EC", TaskType::Boolean, 1),
            preset("t13", "和家人聊天", 2, "👨‍👩‍👧", "#F9FBE7", TaskType::Boolean, 1),
            preset("t14", "记录Todo", 2, "📝", "#ECEFF1", TaskType::Boolean, 1),
            preset("t15", "真诚夸赞", 2, "👍", "#E3F2FD", TaskType::Boolean, 1),
        ])
    }

    /// Presets in catalog order.
    #[must_use]
    pub fn presets(&self) -> &[PresetTask] {
        &self.presets
    }

    /// Looks up a preset by ID.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&PresetTask> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Whether `id` names a preset.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn preset(
    id: &str,
    text: &str,
    value: i64,
    emoji: &str,
    color: &str,
    task_type: TaskType,
    target_count: u32,
) -> PresetTask {
    PresetTask {
        id: id.to_string(),
        text: text.to_string(),
        value,
        emoji: emoji.to_string(),
        color: color.to_string(),
        task_type,
        target_count,
    }
}

/// Picks a palette colour for a task that has none.
///
/// The pick is derived from `seed` (normally the task ID) so a given custom
/// task keeps the same colour across reloads.
#[must_use]
pub fn palette_color(seed: &str) -> &'static str {
    let hash = seed
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
    PALETTE[hash % PALETTE.len()]
}
