pub mod auth;
pub mod nav;
pub mod project;
pub mod task;
