use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::dates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub destination: String,
    #[serde(deserialize_with = "dates::deserialize")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "dates::deserialize")]
    pub end_date: NaiveDate,
    pub days: Vec<Day>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    pub payment_plan: PaymentPlan,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day_number: u32,
    #[serde(deserialize_with = "dates::deserialize")]
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub activities: Activities,
}

/// Activities of a single day, split by time slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activities {
    #[serde(default)]
    pub morning: Vec<Activity>,
    #[serde(default)]
    pub afternoon: Vec<Activity>,
    #[serde(default)]
    pub evening: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    pub city: String,
    #[serde(deserialize_with = "dates::deserialize")]
    pub check_in_date: NaiveDate,
    #[serde(deserialize_with = "dates::deserialize")]
    pub check_out_date: NaiveDate,
    pub nights: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: String,
    pub airline: String,
    pub from: String,
    pub to: String,
    pub departure: DateTime<FixedOffset>,
    pub arrival: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub mode: String,
    pub time: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub amount_due: f64,
    #[serde(deserialize_with = "dates::deserialize")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub installments: Vec<Installment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub installment_number: u32,
    pub amount: f64,
    #[serde(deserialize_with = "dates::deserialize")]
    pub due_date: NaiveDate,
    pub status: String,
}

/// Body of `POST /api/v1/itineraries`. Identity and timestamps are assigned on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItineraryRequest {
    pub user_id: String,
    pub title: String,
    pub destination: String,
    #[serde(deserialize_with = "dates::deserialize")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "dates::deserialize")]
    pub end_date: NaiveDate,
    pub days: Vec<Day>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    pub payment_plan: PaymentPlan,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl CreateItineraryRequest {
    pub fn into_itinerary(self, id: Uuid, now: DateTime<Utc>) -> Itinerary {
        Itinerary {
            id,
            user_id: self.user_id,
            title: self.title,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            days: self.days,
            hotels: self.hotels,
            flights: self.flights,
            transfers: self.transfers,
            payment_plan: self.payment_plan,
            inclusions: self.inclusions,
            exclusions: self.exclusions,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /api/v1/itineraries/:id`. Absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItineraryRequest {
    pub title: Option<String>,
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub end_date: Option<NaiveDate>,
    pub days: Option<Vec<Day>>,
    pub hotels: Option<Vec<Hotel>>,
    pub flights: Option<Vec<Flight>>,
    pub transfers: Option<Vec<Transfer>>,
    pub payment_plan: Option<PaymentPlan>,
    pub inclusions: Option<Vec<String>>,
    pub exclusions: Option<Vec<String>>,
}

impl UpdateItineraryRequest {
    /// True when the update supplies any field that the day count depends on.
    pub fn touches_schedule(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some() || self.days.is_some()
    }

    /// Merges every supplied field into `itinerary`. Timestamps are left to the caller.
    pub fn apply_to(self, itinerary: &mut Itinerary) {
        if let Some(title) = self.title {
            itinerary.title = title;
        }
        if let Some(destination) = self.destination {
            itinerary.destination = destination;
        }
        if let Some(start_date) = self.start_date {
            itinerary.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            itinerary.end_date = end_date;
        }
        if let Some(days) = self.days {
            itinerary.days = days;
        }
        if let Some(hotels) = self.hotels {
            itinerary.hotels = hotels;
        }
        if let Some(flights) = self.flights {
            itinerary.flights = flights;
        }
        if let Some(transfers) = self.transfers {
            itinerary.transfers = transfers;
        }
        if let Some(payment_plan) = self.payment_plan {
            itinerary.payment_plan = payment_plan;
        }
        if let Some(inclusions) = self.inclusions {
            itinerary.inclusions = inclusions;
        }
        if let Some(exclusions) = self.exclusions {
            itinerary.exclusions = exclusions;
        }
    }
}

/// Returns `Some(s)` only when `s` holds visible text.
pub fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}
