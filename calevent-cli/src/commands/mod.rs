pub mod organizer;
pub mod show;
pub mod uid;
