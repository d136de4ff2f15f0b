//! Insight Engine - Budget Health Insights
//!
//! Maps a snapshot of per-category spend and budget figures to a short list
//! of human-readable insights: one overall status followed by a warning for
//! every category that is close to (or over) its budget.
//!
//! ## Overall bands
//!
//! | Spending % of budget | Kind          |
//! |----------------------|---------------|
//! | above 90             | `Warning`     |
//! | above 75, up to 90   | `Info`        |
//! | below 50             | `Celebration` |
//! | 50 to 75             | `Success`     |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use budgetit_core::insights::{generate_insights, Notifier};
//!
//! let insights = generate_insights(&snapshot);
//! let notifier = Notifier::default();
//! notifier.show_random(&insights, &mut rand::thread_rng());
//! ```

pub mod engine;
pub mod notify;
pub mod types;

pub use engine::{category_warnings, generate_insights, overall_insight, CATEGORY_WARNING_RATIO};
pub use notify::{
    pick_notification, FixedIndex, Notification, Notifier, RandomSource, DEFAULT_DISPLAY_DURATION,
};
pub use types::{Insight, InsightKind, SpendingBand};
