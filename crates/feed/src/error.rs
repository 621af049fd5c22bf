#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Chronicle API error: {0}")]
    Api(#[from] chronicle_api::error::Error),

    #[error("A page load is already in flight")]
    LoadInFlight,
}
