//! Linear-scan search over the event collection.
//!
//! Predicates are applied in a fixed order and narrow the result set
//! conjunctively; sorting uses a stable sort, so events with equal keys keep
//! their store order in both directions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::models::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Price,
    Rating,
    Popularity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Search input. Every field is optional and empty strings are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<SortKey>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl SearchFilters {
    fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn matches_query(event: &Event, query: &str) -> bool {
    let query = query.to_lowercase();
    event.title.to_lowercase().contains(&query)
        || event.description.to_lowercase().contains(&query)
        || event
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&query))
}

fn matches_location(event: &Event, location: &str) -> bool {
    let location = location.to_lowercase();
    event.location.city.to_lowercase().contains(&location)
        || event.location.state.to_lowercase().contains(&location)
}

fn matches_dates(event: &Event, filters: &SearchFilters) -> bool {
    filters.start_date.map_or(true, |start| event.date >= start)
        && filters.end_date.map_or(true, |end| event.date <= end)
}

fn matches_price(event: &Event, filters: &SearchFilters) -> bool {
    // An event without tickets has no minimum price to compare
    let Some(price) = event.min_ticket_price() else {
        return false;
    };
    filters.min_price.map_or(true, |min| price >= min)
        && filters.max_price.map_or(true, |max| price <= max)
}

/// Missing prices sort after every real price.
fn compare_prices(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Event, b: &Event, key: SortKey) -> Ordering {
    match key {
        // Calendar day only; same-day events keep store order
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Price => compare_prices(a.min_ticket_price(), b.min_ticket_price()),
        SortKey::Rating => a.rating.total_cmp(&b.rating),
        SortKey::Popularity => a.bookings_count.cmp(&b.bookings_count),
    }
}

pub fn filter_events<'a, I>(events: I, filters: &SearchFilters) -> Vec<Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let query = non_empty(&filters.query);
    let category = non_empty(&filters.category);
    let location = non_empty(&filters.location);

    let mut results: Vec<Event> = events
        .into_iter()
        .filter(|event| query.map_or(true, |q| matches_query(event, q)))
        .filter(|event| category.map_or(true, |c| event.category == c))
        .filter(|event| location.map_or(true, |l| matches_location(event, l)))
        .filter(|event| matches_dates(event, filters))
        .filter(|event| !filters.has_price_range() || matches_price(event, filters))
        .cloned()
        .collect();

    if let Some(key) = filters.sort_by {
        results.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match filters.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::sample_events;

    fn event_with(id: &str, price: Option<i64>, rating: f64, bookings: u32) -> Event {
        let mut event = sample_events().remove(1);
        event.id = id.to_string();
        event.rating = rating;
        event.bookings_count = bookings;
        match price {
            Some(p) => event.ticket_types[0].price = Decimal::from(p),
            None => event.ticket_types.clear(),
        }
        event
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_no_filters_keeps_store_order() {
        let events = sample_events();
        let results = filter_events(&events, &SearchFilters::default());
        assert_eq!(ids(&results), vec!["1", "2"]);
    }

    #[test]
    fn test_query_matches_title_description_and_tags() {
        let events = sample_events();

        let by_title = SearchFilters {
            query: Some("JAZZ night".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &by_title)), vec!["2"]);

        let by_tag = SearchFilters {
            query: Some("innovation".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &by_tag)), vec!["1"]);

        let by_description = SearchFilters {
            query: Some("craft cocktails".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &by_description)), vec!["2"]);
    }

    #[test]
    fn test_blank_strings_are_ignored() {
        let events = sample_events();
        let filters = SearchFilters {
            query: Some("   ".into()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &filters).len(), 2);
    }

    #[test]
    fn test_category_is_exact_and_location_is_substring() {
        let events = sample_events();

        let filters = SearchFilters {
            category: Some("music".into()),
            ..Default::default()
        };
        assert!(filter_events(&events, &filters).is_empty());

        let filters = SearchFilters {
            location: Some("francisco".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["1"]);

        let filters = SearchFilters {
            location: Some("ny".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["2"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let events = sample_events();
        let filters = SearchFilters {
            start_date: NaiveDate::from_ymd_opt(2025, 2, 20),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 14),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["2"]);

        let open_ended = SearchFilters {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 15),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &open_ended)), vec!["1"]);
    }

    #[test]
    fn test_price_range_uses_cheapest_ticket() {
        let events = vec![
            event_with("a", Some(45), 0.0, 0),
            event_with("b", Some(199), 0.0, 0),
            event_with("free", None, 0.0, 0),
        ];
        let filters = SearchFilters {
            min_price: Some(Decimal::from(45)),
            max_price: Some(Decimal::from(100)),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["a"]);

        // No price filter: events without tickets are kept
        assert_eq!(filter_events(&events, &SearchFilters::default()).len(), 3);
    }

    #[test]
    fn test_filters_narrow_conjunctively() {
        let events = sample_events();
        let broad = SearchFilters {
            query: Some("e".into()),
            ..Default::default()
        };
        let narrow = SearchFilters {
            query: Some("e".into()),
            category: Some("Technology".into()),
            ..Default::default()
        };
        let broad_results = filter_events(&events, &broad);
        let narrow_results = filter_events(&events, &narrow);
        assert!(narrow_results.len() <= broad_results.len());
        assert!(narrow_results
            .iter()
            .all(|e| broad_results.iter().any(|b| b.id == e.id)));
    }

    #[test]
    fn test_sort_by_price_puts_ticketless_last() {
        let events = vec![
            event_with("free", None, 0.0, 0),
            event_with("b", Some(199), 0.0, 0),
            event_with("a", Some(45), 0.0, 0),
        ];
        let filters = SearchFilters {
            sort_by: Some(SortKey::Price),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["a", "b", "free"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let events = vec![
            event_with("x", Some(10), 4.5, 3),
            event_with("y", Some(10), 4.5, 9),
            event_with("z", Some(10), 3.0, 1),
        ];

        let asc = SearchFilters {
            sort_by: Some(SortKey::Rating),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &asc)), vec!["z", "x", "y"]);

        let desc = SearchFilters {
            sort_by: Some(SortKey::Rating),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &desc)), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sort_by_popularity_and_date() {
        let events = sample_events();

        let popular = SearchFilters {
            sort_by: Some(SortKey::Popularity),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &popular)), vec!["1", "2"]);

        let soonest = SearchFilters {
            sort_by: Some(SortKey::Date),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &soonest)), vec!["2", "1"]);
    }

    #[test]
    fn test_same_day_events_keep_store_order() {
        let mut late = event_with("late", Some(10), 4.0, 1);
        late.time = chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        let mut early = event_with("early", Some(10), 4.0, 1);
        early.time = chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let events = vec![late, early];

        let filters = SearchFilters {
            sort_by: Some(SortKey::Date),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["late", "early"]);

        let filters = SearchFilters {
            sort_by: Some(SortKey::Date),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events, &filters)), vec!["late", "early"]);
    }
}
