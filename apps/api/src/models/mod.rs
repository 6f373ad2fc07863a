pub mod dates;
pub mod itinerary;

#[cfg(test)]
pub mod fixtures;
