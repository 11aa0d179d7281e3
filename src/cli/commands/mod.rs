pub mod matrix;
pub mod memcheck;
