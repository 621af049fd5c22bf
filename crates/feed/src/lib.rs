pub mod error;
pub mod feed;
pub mod session;
pub mod site;
