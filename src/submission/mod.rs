pub mod fields;
pub mod parser;

pub use fields::Submission;
