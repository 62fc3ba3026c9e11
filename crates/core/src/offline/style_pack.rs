use serde::Serialize;

use super::{GlyphsRasterizationMode, LoadOptionsError, Metadata, validate_metadata};

/// A validated style pack load request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StylePackLoadOptions {
    glyphs_rasterization_mode: Option<GlyphsRasterizationMode>,
    metadata: Option<Metadata>,
    accept_expired: bool,
}

impl StylePackLoadOptions {
    pub fn builder() -> StylePackLoadOptionsBuilder {
        StylePackLoadOptionsBuilder::default()
    }

    /// `None` leaves the provisioning service's own default in place.
    pub fn glyphs_rasterization_mode(&self) -> Option<GlyphsRasterizationMode> {
        self.glyphs_rasterization_mode
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn accept_expired(&self) -> bool {
        self.accept_expired
    }
}

#[derive(Clone, Debug, Default)]
pub struct StylePackLoadOptionsBuilder {
    glyphs_rasterization_mode: Option<GlyphsRasterizationMode>,
    metadata: Option<Result<Metadata, LoadOptionsError>>,
    accept_expired: bool,
}

impl StylePackLoadOptionsBuilder {
    /// Overrides which glyphs are downloaded for the pack.
    pub fn glyphs_rasterization_mode(mut self, mode: GlyphsRasterizationMode) -> Self {
        self.glyphs_rasterization_mode = Some(mode);
        self
    }

    /// Custom JSON stored alongside the style pack. Must serialise to a JSON
    /// object, otherwise [`build`](Self::build) fails.
    pub fn metadata<T: Serialize + ?Sized>(mut self, metadata: &T) -> Self {
        self.metadata = Some(validate_metadata(metadata));
        self
    }

    /// Accept expired style resources instead of failing the load.
    pub fn accept_expired(mut self, accept_expired: bool) -> Self {
        self.accept_expired = accept_expired;
        self
    }

    pub fn build(self) -> Result<StylePackLoadOptions, LoadOptionsError> {
        Ok(StylePackLoadOptions {
            glyphs_rasterization_mode: self.glyphs_rasterization_mode,
            metadata: self.metadata.transpose()?,
            accept_expired: self.accept_expired,
        })
    }
}
