pub mod date;
pub mod page;
pub mod post;
pub mod richtext;
pub mod utils;
