//! Dashboard aggregation
//!
//! The dashboard is built from one [`DashboardSnapshot`]: the license, user
//! and daily-stat lists (all required) plus the optional "today" summary,
//! whose absence never fails the dashboard.

use fispanel_types::{License, StatDay, TodaySummary, User};

use crate::format::{card_scale, format_currency, format_date, month_key, today_key};

/// Number of trailing stat entries shown on the chart
pub const CHART_DAYS: usize = 7;

/// Data fetched for one dashboard render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub licenses: Vec<License>,
    pub users: Vec<User>,
    /// Daily stats in server order
    pub stats: Vec<StatDay>,
    /// `None` when the today endpoint failed
    pub today: Option<TodaySummary>,
}

/// Receipt count and amount over some period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub receipts: i64,
    pub amount: f64,
}

impl Totals {
    fn add(self, day: &StatDay) -> Self {
        Self {
            receipts: self.receipts + day.receipts,
            amount: self.amount + day.amount,
        }
    }
}

fn day_of(stat: &StatDay) -> Option<&str> {
    stat.stat_date.as_deref().map(|d| d.get(..10).unwrap_or(d))
}

/// Sum over stats whose date starts with `month` (`YYYY-MM`)
pub fn month_totals(stats: &[StatDay], month: &str) -> Totals {
    stats
        .iter()
        .filter(|s| s.stat_date.as_deref().is_some_and(|d| d.starts_with(month)))
        .fold(Totals::default(), Totals::add)
}

/// Today's totals: the today endpoint when it answered with a `today` block,
/// otherwise the stat entry dated `today` (`YYYY-MM-DD`), otherwise zero
pub fn today_totals(snapshot: &DashboardSnapshot, today: &str) -> Totals {
    if let Some(block) = snapshot.today.as_ref().and_then(|t| t.today.as_ref()) {
        return Totals {
            receipts: block.total_receipts,
            amount: block.total_amount,
        };
    }
    tracing::debug!(today, "no today block, falling back to daily stats");
    snapshot
        .stats
        .iter()
        .find(|s| day_of(s) == Some(today))
        .map(|s| Totals::default().add(s))
        .unwrap_or_default()
}

/// One stat card
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub id: &'static str,
    pub title: &'static str,
    pub value: String,
    /// Horizontal widening for large amounts
    pub scale: f32,
}

impl StatCard {
    fn count(id: &'static str, title: &'static str, value: impl ToString) -> Self {
        Self {
            id,
            title,
            value: value.to_string(),
            scale: 1.0,
        }
    }

    fn amount(id: &'static str, title: &'static str, amount: f64) -> Self {
        Self {
            id,
            title,
            value: format_currency(amount),
            scale: card_scale(amount),
        }
    }
}

/// One chart column
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub receipts: i64,
    pub amount: f64,
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub chart: Vec<ChartPoint>,
}

impl DashboardView {
    /// Build against explicit `today` (`YYYY-MM-DD`) and `month` (`YYYY-MM`) keys
    pub fn build_for(snapshot: &DashboardSnapshot, today: &str, month: &str) -> Self {
        let active_licenses = snapshot.licenses.iter().filter(|l| l.status.is_active()).count();
        let online_users = snapshot.users.iter().filter(|u| u.is_online).count();
        let today_sum = today_totals(snapshot, today);
        let month_sum = month_totals(&snapshot.stats, month);

        let mut cards = vec![
            StatCard::count("total-licenses", "Total licenses", snapshot.licenses.len()),
            StatCard::count("active-licenses", "Active licenses", active_licenses),
            StatCard::count("total-users", "Total users", snapshot.users.len()),
            StatCard::count("online-users", "Online users", online_users),
            StatCard::count("today-receipts", "Receipts today", today_sum.receipts),
            StatCard::amount("today-amount", "Amount today", today_sum.amount),
            StatCard::count("month-receipts", "Receipts this month", month_sum.receipts),
            StatCard::amount("month-amount", "Amount this month", month_sum.amount),
        ];
        if let Some(active) = snapshot.today.as_ref().and_then(|t| t.active_sessions) {
            cards.push(StatCard::count("active-sessions", "Active sessions", active));
        }

        let skip = snapshot.stats.len().saturating_sub(CHART_DAYS);
        let chart = snapshot.stats[skip..]
            .iter()
            .map(|s| ChartPoint {
                label: format_date(s.stat_date.as_deref()),
                receipts: s.receipts,
                amount: s.amount,
            })
            .collect();

        Self { cards, chart }
    }

    /// Build against the local clock
    pub fn build(snapshot: &DashboardSnapshot) -> Self {
        Self::build_for(snapshot, &today_key(), &month_key())
    }

    pub fn card(&self, id: &str) -> Option<&StatCard> {
        self.cards.iter().find(|c| c.id == id)
    }
}
