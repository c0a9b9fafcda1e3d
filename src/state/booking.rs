//! Service catalog, pricing and time-slot formatting for bookings

use chrono::NaiveDate;

/// A bookable service with its pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOffer {
    pub slug: &'static str,
    pub name: &'static str,
    /// Price of the first room (or load, or visit)
    pub base_cents: u32,
    /// Price of every additional room
    pub per_room_cents: u32,
}

pub const SERVICES: &[ServiceOffer] = &[
    ServiceOffer {
        slug: "standard-cleaning",
        name: "Standard Cleaning",
        base_cents: 8_000,
        per_room_cents: 2_000,
    },
    ServiceOffer {
        slug: "deep-cleaning",
        name: "Deep Cleaning",
        base_cents: 12_000,
        per_room_cents: 3_000,
    },
    ServiceOffer {
        slug: "laundry",
        name: "Laundry (per load)",
        base_cents: 3_500,
        per_room_cents: 3_500,
    },
    ServiceOffer {
        slug: "pest-control",
        name: "Pest Control",
        base_cents: 15_000,
        per_room_cents: 0,
    },
];

/// An arrival window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub slug: &'static str,
    pub label: &'static str,
    pub start_hour: u32,
    pub end_hour: u32,
}

pub const TIME_SLOTS: &[TimeSlot] = &[
    TimeSlot {
        slug: "morning",
        label: "Morning",
        start_hour: 9,
        end_hour: 12,
    },
    TimeSlot {
        slug: "afternoon",
        label: "Afternoon",
        start_hour: 12,
        end_hour: 15,
    },
    TimeSlot {
        slug: "evening",
        label: "Evening",
        start_hour: 15,
        end_hour: 18,
    },
];

/// Icon per service slug; the last entry is the fallback for unknown slugs
const SERVICE_ICONS: &[(&str, &str)] = &[
    ("standard-cleaning", "🧹"),
    ("deep-cleaning", "🧽"),
    ("laundry", "🧺"),
    ("pest-control", "🐜"),
    ("", "🏠"),
];

pub fn service(slug: &str) -> Option<&'static ServiceOffer> {
    SERVICES.iter().find(|s| s.slug == slug)
}

pub fn time_slot(slug: &str) -> Option<&'static TimeSlot> {
    TIME_SLOTS.iter().find(|s| s.slug == slug)
}

/// Look up the icon for a service, falling back to a generic house
pub fn service_icon(slug: &str) -> &'static str {
    SERVICE_ICONS
        .iter()
        .find(|(key, _)| *key == slug)
        .or_else(|| SERVICE_ICONS.last())
        .map(|(_, icon)| *icon)
        .unwrap_or("🏠")
}

/// Estimated price in cents; `None` for unknown services, zero rooms or
/// a total that does not fit in `u32`
pub fn estimate_price_cents(slug: &str, rooms: u32) -> Option<u32> {
    let extra_rooms = rooms.checked_sub(1)?;
    let offer = service(slug)?;
    offer
        .per_room_cents
        .checked_mul(extra_rooms)?
        .checked_add(offer.base_cents)
}

/// Format cents as dollars, e.g. `$120.00`
pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn format_hour(hour: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:00 {suffix}")
}

/// Format a booking window, e.g. `Tue, Oct 20 · 9:00 AM - 12:00 PM`
pub fn format_slot(date: NaiveDate, slot_slug: &str) -> String {
    let day = date.format("%a, %b %-d");
    match time_slot(slot_slug) {
        Some(slot) => format!(
            "{day} · {} - {}",
            format_hour(slot.start_hour),
            format_hour(slot.end_hour)
        ),
        None => day.to_string(),
    }
}
