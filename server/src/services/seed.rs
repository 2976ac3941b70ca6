//! Sample records written on first start when a collection is absent.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::models::{
    Coordinates, Event, EventStatus, Location, OrganizerSummary, Review, TicketType,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    date(year, month, day)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn sample_events() -> Vec<Event> {
    vec![
        Event {
            id: "1".to_string(),
            title: "Tech Conference 2025".to_string(),
            description: "Join industry leaders for cutting-edge discussions on technology \
                          trends, AI, and innovation. Network with professionals and discover \
                          the latest developments."
                .to_string(),
            date: date(2025, 3, 15),
            time: time(9, 0),
            location: Location {
                address: "123 Convention Center Dr".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94103".to_string(),
                coordinates: Some(Coordinates {
                    lat: 37.7749,
                    lng: -122.4194,
                }),
            },
            capacity: 500,
            category: "Technology".to_string(),
            organizer: OrganizerSummary {
                id: "org1".to_string(),
                name: "TechEvents Inc".to_string(),
                email: "contact@techevents.com".to_string(),
                avatar: Some(
                    "https://images.pexels.com/photos/2182970/pexels-photo-2182970.jpeg?w=100&h=100&fit=crop"
                        .to_string(),
                ),
            },
            images: strings(&[
                "https://images.pexels.com/photos/2774556/pexels-photo-2774556.jpeg?w=800&h=400&fit=crop",
                "https://images.pexels.com/photos/1181467/pexels-photo-1181467.jpeg?w=800&h=400&fit=crop",
            ]),
            ticket_types: vec![
                TicketType {
                    id: "ticket1".to_string(),
                    name: "General Admission".to_string(),
                    description: "Access to all sessions and networking events".to_string(),
                    price: Decimal::from(199),
                    quantity: 300,
                    sold: 145,
                    sale_start_date: date(2025, 1, 1),
                    sale_end_date: date(2025, 3, 14),
                    features: strings(&["All Sessions", "Networking Events", "Lunch Included"]),
                },
                TicketType {
                    id: "ticket2".to_string(),
                    name: "VIP Pass".to_string(),
                    description: "Premium access with exclusive perks".to_string(),
                    price: Decimal::from(399),
                    quantity: 100,
                    sold: 67,
                    sale_start_date: date(2025, 1, 1),
                    sale_end_date: date(2025, 3, 14),
                    features: strings(&[
                        "All Sessions",
                        "VIP Lounge",
                        "Priority Seating",
                        "Exclusive Dinner",
                    ]),
                },
            ],
            tags: strings(&["technology", "networking", "ai", "innovation"]),
            status: EventStatus::Published,
            created_at: midnight(2025, 1, 1),
            updated_at: midnight(2025, 1, 5),
            bookings_count: 212,
            rating: 4.8,
            review_count: 89,
        },
        Event {
            id: "2".to_string(),
            title: "Jazz Night at Blue Moon".to_string(),
            description: "An intimate evening of smooth jazz featuring talented local \
                          musicians. Enjoy craft cocktails and exceptional music in a cozy \
                          atmosphere."
                .to_string(),
            date: date(2025, 2, 20),
            time: time(20, 0),
            location: Location {
                address: "456 Music Ave".to_string(),
                city: "New York".to_string(),
                state: "NY".to_string(),
                zip_code: "10001".to_string(),
                coordinates: None,
            },
            capacity: 80,
            category: "Music".to_string(),
            organizer: OrganizerSummary {
                id: "org2".to_string(),
                name: "Blue Moon Venue".to_string(),
                email: "events@bluemoon.com".to_string(),
                avatar: None,
            },
            images: strings(&[
                "https://images.pexels.com/photos/210922/pexels-photo-210922.jpeg?w=800&h=400&fit=crop",
            ]),
            ticket_types: vec![TicketType {
                id: "ticket3".to_string(),
                name: "Standard".to_string(),
                description: "General admission seating".to_string(),
                price: Decimal::from(45),
                quantity: 80,
                sold: 23,
                sale_start_date: date(2025, 1, 15),
                sale_end_date: date(2025, 2, 19),
                features: strings(&["Seating", "One Drink Included"]),
            }],
            tags: strings(&["jazz", "music", "nightlife"]),
            status: EventStatus::Published,
            created_at: midnight(2025, 1, 15),
            updated_at: midnight(2025, 1, 15),
            bookings_count: 23,
            rating: 4.6,
            review_count: 12,
        },
    ]
}

pub fn sample_reviews() -> Vec<Review> {
    vec![
        Review {
            id: "1".to_string(),
            event_id: "1".to_string(),
            user_id: "user1".to_string(),
            user_name: "Sarah Johnson".to_string(),
            user_avatar: Some(
                "https://images.pexels.com/photos/415829/pexels-photo-415829.jpeg?w=50&h=50&fit=crop&crop=face"
                    .to_string(),
            ),
            rating: 5,
            comment: "Amazing conference! Great speakers and networking opportunities."
                .to_string(),
            helpful: 12,
            created_at: midnight(2025, 1, 10),
        },
        Review {
            id: "2".to_string(),
            event_id: "1".to_string(),
            user_id: "user2".to_string(),
            user_name: "Mike Chen".to_string(),
            user_avatar: Some(
                "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?w=50&h=50&fit=crop&crop=face"
                    .to_string(),
            ),
            rating: 4,
            comment: "Very informative sessions. The venue was perfect and well organized."
                .to_string(),
            helpful: 8,
            created_at: midnight(2025, 1, 12),
        },
    ]
}
