pub mod system_programs;
pub mod users;
