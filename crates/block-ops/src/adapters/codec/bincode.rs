use crate::domain::errors::CodecError;
use crate::ports::outbound::BlockCodec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default envelope codec using bincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BlockCodec for BincodeCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::new(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(data).map_err(|e| CodecError::new(e.to_string()))
    }
}
