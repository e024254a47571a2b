pub mod handlers;
pub mod initialization;
pub mod middleware;
pub mod system_programs;
pub mod tracing;
pub mod users;
