// Job catalog: home-page rankings, keyword search, detail lookup and creation.

pub mod catalog;
pub mod handlers;
pub mod ranking;
pub mod search;
