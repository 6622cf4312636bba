use thiserror::Error;

pub type PropResult<T> = Result<T, PropError>;

#[derive(Error, Debug)]
pub enum PropError {
    /// The active serializer produced a value outside the host's primitive
    /// kinds. Fatal to the call; chunks already written in the same call are
    /// not rolled back.
    #[error("Serializer for \"{id}\" returned {kind}, which is not storable as a host primitive")]
    InvalidSerializationResult { id: Box<str>, kind: Box<str> },
    /// A codec reported that it could not serialize the given logical value.
    #[error("Serialize error: {0}")]
    Serialize(Box<str>),
}
