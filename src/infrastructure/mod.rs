pub mod logging;
pub mod smtp;
pub mod validation;
