use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub views: u32,
    pub bookings: u32,
    pub revenue: Decimal,
}

/// Percentages keyed by bucket label.
#[derive(Debug, Clone, Serialize)]
pub struct Demographics {
    pub age_groups: BTreeMap<String, u32>,
    pub locations: BTreeMap<String, u32>,
}

/// Mocked organizer analytics. Only `bookings` and `revenue` are derived
/// from stored data; everything else is random or fixed.
#[derive(Debug, Clone, Serialize)]
pub struct EventAnalytics {
    pub event_id: String,
    pub views: u32,
    pub bookings: u32,
    pub revenue: Decimal,
    pub conversion_rate: u32,
    pub daily_stats: Vec<DailyStat>,
    pub demographics: Demographics,
}
