//! Shared test fixtures for itinerary aggregates.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::models::itinerary::{
    Activities, Activity, CreateItineraryRequest, Day, Flight, Hotel, Installment, Itinerary,
    PaymentPlan, Transfer,
};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn activity(name: &str, duration: Option<&str>) -> Activity {
    Activity {
        name: name.to_string(),
        description: format!("{name} with a local guide"),
        location: "Old Town".to_string(),
        duration: duration.map(str::to_string),
    }
}

/// Builds `count` consecutive days starting at `start_date()`.
pub fn days(count: u32) -> Vec<Day> {
    (0..count)
        .map(|i| Day {
            day_number: i + 1,
            date: start_date() + Duration::days(i as i64),
            title: format!("Day {} plans", i + 1),
            activities: Activities {
                morning: vec![activity("Walking tour", Some("3 hours"))],
                afternoon: vec![],
                evening: vec![activity("Dinner cruise", None)],
            },
        })
        .collect()
}

pub fn payment_plan(amount_due: f64, installments: &[f64]) -> PaymentPlan {
    PaymentPlan {
        amount_due,
        due_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        installments: installments
            .iter()
            .enumerate()
            .map(|(i, amount)| Installment {
                installment_number: i as u32 + 1,
                amount: *amount,
                due_date: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap() + Duration::days(i as i64 * 14),
                status: if i == 0 { "paid" } else { "pending" }.to_string(),
            })
            .collect(),
    }
}

pub fn transfer() -> Transfer {
    Transfer {
        from: "Airport".to_string(),
        to: "Hotel Central".to_string(),
        mode: "Private car".to_string(),
        time: Utc.with_ymd_and_hms(2024, 1, 1, 14, 30, 0).unwrap().into(),
    }
}

pub fn create_request(day_count: u32) -> CreateItineraryRequest {
    CreateItineraryRequest {
        user_id: "user-42".to_string(),
        title: "Winter in Prague".to_string(),
        destination: "Prague, Czech Republic".to_string(),
        start_date: start_date(),
        end_date: start_date() + Duration::days(day_count as i64 - 1),
        days: days(day_count),
        hotels: vec![
            Hotel {
                name: "Hotel Central".to_string(),
                city: "Prague".to_string(),
                check_in_date: start_date(),
                check_out_date: start_date() + Duration::days(day_count as i64 - 1),
                nights: day_count.saturating_sub(1),
                address: Some("Hybernska 10".to_string()),
            },
            Hotel {
                name: "Riverside Inn".to_string(),
                city: "Prague".to_string(),
                check_in_date: start_date(),
                check_out_date: start_date() + Duration::days(1),
                nights: 1,
                address: None,
            },
        ],
        flights: vec![Flight {
            flight_number: "OK 101".to_string(),
            airline: "Czech Airlines".to_string(),
            from: "London".to_string(),
            to: "Prague".to_string(),
            departure: Utc.with_ymd_and_hms(2024, 1, 1, 9, 5, 0).unwrap().into(),
            arrival: Utc.with_ymd_and_hms(2024, 1, 1, 12, 15, 0).unwrap().into(),
        }],
        transfers: vec![],
        payment_plan: payment_plan(1000.0, &[400.0, 600.0]),
        inclusions: vec!["Breakfast".to_string(), "Airport pickup".to_string()],
        exclusions: vec!["Travel insurance".to_string()],
    }
}

/// A valid itinerary spanning `day_count` days (must be at least 2).
pub fn sample_itinerary(day_count: u32) -> Itinerary {
    let now = Utc.with_ymd_and_hms(2023, 10, 1, 8, 0, 0).unwrap();
    create_request(day_count).into_itinerary(Uuid::new_v4(), now)
}
