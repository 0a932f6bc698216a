//! Presentation Layer
//!
//! Form view-models for the login and password reset screens. They hold
//! field values and the single inline error; rendering is left to the host.

pub mod login_form;
pub mod new_password_form;
pub mod otp_input;

pub use login_form::LoginForm;
pub use new_password_form::NewPasswordForm;
pub use otp_input::OtpInput;
