//! Value Object Module

pub mod email;
pub mod new_password;
pub mod otp_code;
