pub mod add_device;
pub mod assign_device;
pub mod create_zone;
pub mod dashboard;
pub mod login;
pub mod register;
pub mod schedule;
pub mod sensor_card;
pub mod valve_card;
pub mod zone_card;
