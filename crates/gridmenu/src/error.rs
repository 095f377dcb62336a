/// Errors surfaced to callers of gridmenu
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("gridmenu is already registered - disable the owning module before registering again")]
    AlreadyRegistered,
}

pub type Result<T> = std::result::Result<T, Error>;
