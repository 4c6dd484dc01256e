pub mod alarm;
pub mod locale;
pub mod observance;
pub mod repeat;
pub mod state;
