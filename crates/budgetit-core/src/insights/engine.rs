//! Insight Engine - turns a spend/budget snapshot into insights

use crate::models::{title_case, CategorySnapshot, Totals};

use super::types::{Insight, InsightKind, SpendingBand};

/// Share of a category budget above which the category gets its own warning
pub const CATEGORY_WARNING_RATIO: f64 = 0.9;

const CURRENCY: &str = "₹";

/// Produce the insights for a snapshot
///
/// The first element is always the overall status; category warnings
/// follow in map iteration order. The function is pure: the same snapshot
/// always yields the same list.
pub fn generate_insights(snapshot: &CategorySnapshot) -> Vec<Insight> {
    let totals = snapshot.totals();

    let mut insights = vec![overall_insight(&totals)];
    insights.extend(category_warnings(snapshot));

    tracing::debug!(
        count = insights.len(),
        percentage = totals.spending_percentage,
        "Generated insights"
    );

    insights
}

/// The single overall-status insight for the given totals
pub fn overall_insight(totals: &Totals) -> Insight {
    let spent = totals.total_spent;
    let pct = totals.spending_percentage;

    match SpendingBand::from_percentage(pct) {
        SpendingBand::Overspending => Insight::new(
            InsightKind::Warning,
            "🚨 Overspending Alert!",
            format!("You've spent {CURRENCY}{spent:.0} ({pct:.1}% of budget)"),
        )
        .with_tip(
            "💡 Quick Fixes: Cook at home (save ₹200/day), use public transport, \
             cancel unused subscriptions, set daily spending limits of ₹500.",
        )
        .with_quote(
            "\"A budget is telling your money where to go instead of wondering where it went.\" \
             - Dave Ramsey",
        ),
        SpendingBand::Approaching => Insight::new(
            InsightKind::Info,
            "⚠️ Approaching Budget Limit",
            format!("You're at {CURRENCY}{spent:.0} ({pct:.1}% of budget)"),
        )
        .with_tip(
            "🎯 Stay on track: Review daily expenses, avoid impulse purchases, \
             stick to your meal plan, use discount apps.",
        )
        .with_quote(
            "\"It's not how much money you make, but how much money you keep.\" \
             - Robert Kiyosaki",
        ),
        SpendingBand::Saving => Insight::new(
            InsightKind::Celebration,
            "🎉 Fantastic Savings!",
            format!("Outstanding! Only {CURRENCY}{spent:.0} spent ({pct:.1}% of budget)"),
        )
        .with_tip(
            "💰 Investment Ideas: Start SIP with ₹1000/month, open PPF account, \
             invest in index funds, build emergency fund worth 6 months expenses.",
        )
        .with_quote(
            "\"The best time to plant a tree was 20 years ago. The second best time is now.\" \
             - Chinese Proverb",
        ),
        SpendingBand::Balanced => Insight::new(
            InsightKind::Success,
            "✅ Perfect Balance!",
            format!("Excellent! {CURRENCY}{spent:.0} spent ({pct:.1}% of budget)"),
        )
        .with_tip(
            "🌟 Keep the momentum: Continue tracking daily, reward yourself occasionally, \
             maintain this discipline for long-term wealth.",
        )
        .with_quote("\"A penny saved is a penny earned.\" - Benjamin Franklin"),
    }
}

/// Warnings for categories whose spend exceeds 90% of a positive budget
pub fn category_warnings(snapshot: &CategorySnapshot) -> Vec<Insight> {
    snapshot
        .spent
        .iter()
        .filter_map(|(category, &spent)| {
            let budget = snapshot.budget_for(category);
            if budget > 0.0 && spent > budget * CATEGORY_WARNING_RATIO {
                Some(Insight::new(
                    InsightKind::Warning,
                    format!("{} Alert", title_case(category)),
                    format!("You're overspending on {category}. Consider alternatives!"),
                ))
            } else {
                None
            }
        })
        .collect()
}
