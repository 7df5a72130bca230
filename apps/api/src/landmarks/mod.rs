pub mod cache;
pub mod dedupe;
pub mod handlers;
