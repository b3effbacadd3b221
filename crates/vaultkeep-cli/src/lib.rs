#![doc = include_str!("../README.md")]

mod color;

pub use color::{install_color_eyre, Color};
use inquire::{error::InquireResult, Password, Text};

/// Use `value` when given, otherwise ask for it on the terminal.
pub fn text_prompt_when_none(prompt: &str, value: Option<String>) -> InquireResult<String> {
    match value {
        Some(value) => Ok(value),
        None => Text::new(prompt).prompt(),
    }
}

/// Like [text_prompt_when_none], without echoing the input.
pub fn password_prompt_when_none(prompt: &str, value: Option<String>) -> InquireResult<String> {
    match value {
        Some(value) => Ok(value),
        None => Password::new(prompt).without_confirmation().prompt(),
    }
}
