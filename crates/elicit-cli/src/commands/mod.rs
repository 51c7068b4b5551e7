pub mod chat;
pub mod config;
pub mod dispatch;
pub mod explain;
pub mod initial;
pub mod next;
pub mod predict;
pub mod schema;
pub mod shared;
