//! Section builders for the itinerary report.
//!
//! Each builder writes one logical section onto the current page. Page breaks
//! between sections belong to the assembler, never to a builder.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::itinerary::validation::inclusive_day_span;
use crate::models::itinerary::{
    non_blank, Activity, Day, Flight, Hotel, Itinerary, PaymentPlan, Transfer,
};
use crate::report::canvas::{Align, Canvas, FontStyle, Rgb};

// ────────────────────────────────────────────────────────────────────────────
// Palette and formats
// ────────────────────────────────────────────────────────────────────────────

const NAVY: Rgb = Rgb::new(25, 25, 112);
const STEEL_BLUE: Rgb = Rgb::new(70, 130, 180);
const CRIMSON: Rgb = Rgb::new(220, 20, 60);
const BLACK: Rgb = Rgb::new(0, 0, 0);
const DARK_GRAY: Rgb = Rgb::new(60, 60, 60);
const GRAY: Rgb = Rgb::new(100, 100, 100);
const GREEN: Rgb = Rgb::new(0, 100, 0);
const RED: Rgb = Rgb::new(200, 0, 0);

const DEFAULT_MARGIN_MM: f32 = 10.0;
const DETAIL_INDENT_MM: f32 = 20.0;

pub const INCLUSION_MARKER: &str = "✓";
pub const EXCLUSION_MARKER: &str = "✗";

const DATE_FORMAT: &str = "%B %-d, %Y";
const DAY_DATE_FORMAT: &str = "%A, %B %-d, %Y";
const TIMESTAMP_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_day_date(date: NaiveDate) -> String {
    date.format(DAY_DATE_FORMAT).to_string()
}

/// Formats `ts` in its own offset, so a 09:05 departure at +05:30 prints as 9:05 AM.
pub fn format_timestamp<Tz: TimeZone>(ts: DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn style<C: Canvas + ?Sized>(canvas: &mut C, font: FontStyle, size: f32, color: Rgb) {
    canvas.set_font(font, size);
    canvas.set_text_color(color);
}

fn section_title<C: Canvas + ?Sized>(canvas: &mut C, title: &str) {
    style(canvas, FontStyle::Bold, 16.0, NAVY);
    canvas.write_cell(12.0, title, Align::Left);
    canvas.line_break(3.0);
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

pub fn title_section<C: Canvas + ?Sized>(canvas: &mut C, itinerary: &Itinerary) {
    style(canvas, FontStyle::Bold, 28.0, NAVY);
    canvas.write_cell(20.0, &itinerary.title, Align::Center);
    canvas.line_break(10.0);

    style(canvas, FontStyle::Italic, 18.0, STEEL_BLUE);
    canvas.write_cell(10.0, &itinerary.destination, Align::Center);
    canvas.line_break(20.0);

    style(canvas, FontStyle::Regular, 14.0, BLACK);
    let dates = format!(
        "{} to {}",
        format_date(itinerary.start_date),
        format_date(itinerary.end_date)
    );
    canvas.write_cell(10.0, &dates, Align::Center);
    canvas.line_break(10.0);

    style(canvas, FontStyle::Regular, 12.0, GRAY);
    canvas.write_cell(8.0, &format!("Itinerary ID: {}", itinerary.id), Align::Center);
    canvas.write_cell(8.0, &format!("User ID: {}", itinerary.user_id), Align::Center);
    canvas.line_break(20.0);

    let days = inclusive_day_span(itinerary.start_date, itinerary.end_date);
    style(canvas, FontStyle::Bold, 16.0, CRIMSON);
    canvas.write_cell(
        10.0,
        &format!("{} Days / {} Nights", days, days - 1),
        Align::Center,
    );
}

pub fn overview_section<C: Canvas + ?Sized>(canvas: &mut C, itinerary: &Itinerary) {
    section_title(canvas, "Trip Overview");

    style(canvas, FontStyle::Regular, 11.0, BLACK);
    let lines = [
        format!("Duration: {} days", itinerary.days.len()),
        format!("Hotels: {} accommodations", itinerary.hotels.len()),
        format!("Flights: {} flights booked", itinerary.flights.len()),
        format!("Transfers: {} transfers arranged", itinerary.transfers.len()),
    ];
    for line in &lines {
        canvas.write_wrapped(6.0, line, Align::Left);
    }
    canvas.line_break(5.0);

    style(canvas, FontStyle::Bold, 12.0, CRIMSON);
    canvas.write_wrapped(
        8.0,
        &format!(
            "Total Package Cost: {:.2}",
            itinerary.payment_plan.amount_due
        ),
        Align::Left,
    );
}

pub fn day_section<C: Canvas + ?Sized>(canvas: &mut C, day: &Day) {
    style(canvas, FontStyle::Bold, 16.0, NAVY);
    canvas.write_cell(
        10.0,
        &format!("Day {} - {}", day.day_number, day.title),
        Align::Left,
    );

    style(canvas, FontStyle::Italic, 10.0, GRAY);
    canvas.write_cell(6.0, &format_day_date(day.date), Align::Left);
    canvas.line_break(5.0);

    let slots = [
        ("Morning", &day.activities.morning),
        ("Afternoon", &day.activities.afternoon),
        ("Evening", &day.activities.evening),
    ];
    for (label, activities) in slots {
        if !activities.is_empty() {
            time_slot(canvas, label, activities);
        }
    }
}

fn time_slot<C: Canvas + ?Sized>(canvas: &mut C, label: &str, activities: &[Activity]) {
    style(canvas, FontStyle::Bold, 12.0, STEEL_BLUE);
    canvas.write_cell(8.0, label, Align::Left);

    for activity in activities {
        style(canvas, FontStyle::Bold, 11.0, BLACK);
        canvas.write_wrapped(6.0, &format!("• {}", activity.name), Align::Left);

        canvas.set_left_margin(DETAIL_INDENT_MM);
        style(canvas, FontStyle::Regular, 10.0, DARK_GRAY);
        canvas.write_wrapped(5.0, &activity.description, Align::Left);

        style(canvas, FontStyle::Italic, 9.0, GRAY);
        canvas.write_wrapped(5.0, &format!("Location: {}", activity.location), Align::Left);
        if let Some(duration) = non_blank(activity.duration.as_ref()) {
            canvas.write_wrapped(5.0, &format!("Duration: {duration}"), Align::Left);
        }

        canvas.set_left_margin(DEFAULT_MARGIN_MM);
        canvas.line_break(3.0);
    }

    canvas.line_break(2.0);
}

pub fn hotels_section<C: Canvas + ?Sized>(canvas: &mut C, hotels: &[Hotel]) {
    section_title(canvas, "Accommodation Details");

    for (i, hotel) in hotels.iter().enumerate() {
        style(canvas, FontStyle::Bold, 12.0, BLACK);
        canvas.write_cell(8.0, &format!("{}. {}", i + 1, hotel.name), Align::Left);

        style(canvas, FontStyle::Regular, 10.0, DARK_GRAY);
        let lines = [
            format!("City: {}", hotel.city),
            format!("Check-in: {}", format_date(hotel.check_in_date)),
            format!("Check-out: {}", format_date(hotel.check_out_date)),
            format!("Nights: {}", hotel.nights),
        ];
        for line in &lines {
            canvas.write_wrapped(5.0, line, Align::Left);
        }

        if let Some(address) = non_blank(hotel.address.as_ref()) {
            style(canvas, FontStyle::Italic, 9.0, GRAY);
            canvas.write_wrapped(5.0, &format!("Address: {address}"), Align::Left);
        }

        canvas.line_break(5.0);
    }
}

pub fn flights_section<C: Canvas + ?Sized>(canvas: &mut C, flights: &[Flight]) {
    section_title(canvas, "Flight Details");

    for (i, flight) in flights.iter().enumerate() {
        style(canvas, FontStyle::Bold, 12.0, BLACK);
        canvas.write_cell(
            8.0,
            &format!("{}. {} - {}", i + 1, flight.flight_number, flight.airline),
            Align::Left,
        );

        style(canvas, FontStyle::Regular, 10.0, DARK_GRAY);
        let lines = [
            format!("From: {}", flight.from),
            format!("To: {}", flight.to),
            format!("Departure: {}", format_timestamp(flight.departure)),
            format!("Arrival: {}", format_timestamp(flight.arrival)),
        ];
        for line in &lines {
            canvas.write_wrapped(5.0, line, Align::Left);
        }

        canvas.line_break(5.0);
    }
}

pub fn transfers_section<C: Canvas + ?Sized>(canvas: &mut C, transfers: &[Transfer]) {
    section_title(canvas, "Transfer Details");

    for (i, transfer) in transfers.iter().enumerate() {
        style(canvas, FontStyle::Bold, 11.0, BLACK);
        canvas.write_cell(
            8.0,
            &format!("{}. {} to {}", i + 1, transfer.from, transfer.to),
            Align::Left,
        );

        style(canvas, FontStyle::Regular, 10.0, DARK_GRAY);
        canvas.write_wrapped(5.0, &format!("Mode: {}", transfer.mode), Align::Left);
        canvas.write_wrapped(
            5.0,
            &format!("Timing: {}", format_timestamp(transfer.time)),
            Align::Left,
        );

        canvas.line_break(4.0);
    }
}

pub fn payment_section<C: Canvas + ?Sized>(canvas: &mut C, plan: &PaymentPlan) {
    section_title(canvas, "Payment Plan");

    style(canvas, FontStyle::Bold, 14.0, CRIMSON);
    canvas.write_cell(
        10.0,
        &format!("Total Amount: {:.2}", plan.amount_due),
        Align::Left,
    );
    canvas.line_break(5.0);

    style(canvas, FontStyle::Bold, 11.0, BLACK);
    canvas.write_cell(8.0, "Installments:", Align::Left);

    for installment in &plan.installments {
        style(canvas, FontStyle::Bold, 10.0, BLACK);
        canvas.write_cell(
            7.0,
            &format!(
                "Installment {} - {:.2}",
                installment.installment_number, installment.amount
            ),
            Align::Left,
        );

        style(canvas, FontStyle::Regular, 9.0, DARK_GRAY);
        canvas.write_wrapped(
            5.0,
            &format!("Due Date: {}", format_date(installment.due_date)),
            Align::Left,
        );
        canvas.write_wrapped(5.0, &format!("Status: {}", installment.status), Align::Left);

        canvas.line_break(3.0);
    }
}

pub fn inclusions_exclusions_section<C: Canvas + ?Sized>(
    canvas: &mut C,
    inclusions: &[String],
    exclusions: &[String],
) {
    section_title(canvas, "Inclusions");
    style(canvas, FontStyle::Regular, 10.0, GREEN);
    for item in inclusions {
        canvas.write_wrapped(6.0, &format!("{INCLUSION_MARKER} {item}"), Align::Left);
    }

    canvas.line_break(10.0);

    section_title(canvas, "Exclusions");
    style(canvas, FontStyle::Regular, 10.0, RED);
    for item in exclusions {
        canvas.write_wrapped(6.0, &format!("{EXCLUSION_MARKER} {item}"), Align::Left);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
