//! Response decoders
//!
//! A [`Decode`] implementation owns its destination value and fills it
//! from a buffered response body. [`Response::decode`](crate::Response::decode)
//! drives any implementation; [`JsonDecoder`] and [`XmlDecoder`] cover the
//! built-in formats.

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Deserialize a buffered body into a held destination value.
pub trait Decode {
    /// Decode `bytes` into the destination.
    fn decode(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

/// JSON decoder holding its destination value.
#[derive(Debug)]
pub struct JsonDecoder<T> {
    value: Option<T>,
}

impl<T> JsonDecoder<T> {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self { value: None }
    }

    /// The decoded value, once [`Decode::decode`] has run.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the decoder and take the decoded value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Decode for JsonDecoder<T> {
    fn decode(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let value = serde_json::from_slice(bytes).map_err(|err| Error::Decode(err.to_string()))?;
        self.value = Some(value);
        Ok(())
    }
}

/// XML decoder holding its destination value.
#[derive(Debug)]
pub struct XmlDecoder<T> {
    value: Option<T>,
}

impl<T> XmlDecoder<T> {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self { value: None }
    }

    /// The decoded value, once [`Decode::decode`] has run.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the decoder and take the decoded value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for XmlDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Decode for XmlDecoder<T> {
    fn decode(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let text = std::str::from_utf8(bytes).map_err(|err| Error::Decode(err.to_string()))?;
        let value = quick_xml::de::from_str(text).map_err(|err| Error::Decode(err.to_string()))?;
        self.value = Some(value);
        Ok(())
    }
}
