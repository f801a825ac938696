pub mod question;
pub mod submission;
pub mod test_case;
