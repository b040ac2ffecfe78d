use crate::codec::{Codec, SharedCodec, default_codec};
use crate::reflect::DEFAULT_TAG;
use crate::schema::NamingConvention;
use std::fmt;
use std::sync::Arc;

/// Client configuration.
///
/// # Example
///
/// ```ignore
/// use dborm::{ClientConfig, NamingConvention};
///
/// let config = ClientConfig::new()
///     .naming(NamingConvention::SnakeCase)
///     .strict(false);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Tag key read from field attributes.
    pub tag: String,
    /// Column name normalization for result mapping.
    pub naming: NamingConvention,
    /// Fail on result columns without a destination field.
    pub strict: bool,
    /// Serialization of complex columns, shared by writes and reads.
    pub codec: SharedCodec,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            naming: NamingConvention::default(),
            strict: true,
            codec: default_codec(),
        }
    }
}

impl ClientConfig {
    /// Defaults: tag `db`, case-insensitive names, strict mapping, JSON codec.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn codec<C: Codec + 'static>(mut self, codec: C) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn codec_arc(mut self, codec: SharedCodec) -> Self {
        self.codec = codec;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("tag", &self.tag)
            .field("naming", &self.naming)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
