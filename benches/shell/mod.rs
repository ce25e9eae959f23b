pub mod escape;
pub mod session;
