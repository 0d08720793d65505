//! Form domain layer

mod form_state;

pub use form_state::{ContactForm, Form, FormRow};
