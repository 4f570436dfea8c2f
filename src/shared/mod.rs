pub mod constants;
pub mod test_helpers;
pub mod timezone;
pub mod types;
pub mod validation;
