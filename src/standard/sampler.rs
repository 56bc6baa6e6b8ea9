//! An image sampler.

use std::ops::{Deref, DerefMut};
use clbind_core::{self as core, Sampler as SamplerCore, AddressingMode, FilterMode, SamplerInfo,
    InfoResult};
use crate::error::{Error, Result};
use crate::standard::Context;

/// An image sampler.
#[derive(Clone, Debug)]
pub struct Sampler(SamplerCore);

impl Sampler {
    /// Creates and returns a new sampler.
    ///
    /// ### Enum Quick Reference
    ///
    /// `addressing_mode`:
    ///
    /// - AddressingMode::None
    /// - AddressingMode::ClampToEdge
    /// - AddressingMode::Clamp
    /// - AddressingMode::Repeat
    /// - AddressingMode::MirroredRepeat
    ///
    /// `filter_mode`:
    ///
    /// - FilterMode::Nearest
    /// - FilterMode::Linear
    ///
    pub fn new(context: &Context, normalize_coords: bool, addressing_mode: AddressingMode,
            filter_mode: FilterMode) -> Result<Sampler>
    {
        let sampler_core = core::create_sampler(context, normalize_coords, addressing_mode,
            filter_mode)?;
        Ok(Sampler(sampler_core))
    }

    /// Returns various kinds of information about the sampler.
    pub fn info(&self, info_kind: SamplerInfo) -> Result<InfoResult> {
        core::get_sampler_info(&self.0, info_kind).map_err(Error::from)
    }

    /// Returns `true` if the sampler uses normalized coordinates.
    pub fn normalized_coords(&self) -> Result<bool> {
        let info = self.info(SamplerInfo::NormalizedCoords)?;
        info.as_bool().ok_or_else(|| format!("Sampler::normalized_coords: unexpected info \
            result: {:?}", info).into())
    }

    pub fn addressing_mode(&self) -> Result<AddressingMode> {
        match self.info(SamplerInfo::AddressingMode)? {
            InfoResult::AddressingMode(mode) => Ok(mode),
            other => Err(format!("Sampler::addressing_mode: unexpected info result: {:?}",
                other).into()),
        }
    }

    pub fn filter_mode(&self) -> Result<FilterMode> {
        match self.info(SamplerInfo::FilterMode)? {
            InfoResult::FilterMode(mode) => Ok(mode),
            other => Err(format!("Sampler::filter_mode: unexpected info result: {:?}",
                other).into()),
        }
    }

    /// Returns a reference to the core pointer wrapper.
    #[inline]
    pub fn core(&self) -> &SamplerCore {
        &self.0
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("ReferenceCount", &self.info(SamplerInfo::ReferenceCount))
            .field("Context", &self.info(SamplerInfo::Context))
            .field("NormalizedCoords", &self.info(SamplerInfo::NormalizedCoords))
            .field("AddressingMode", &self.info(SamplerInfo::AddressingMode))
            .field("FilterMode", &self.info(SamplerInfo::FilterMode))
            .finish()
    }
}

impl std::fmt::Display for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl Deref for Sampler {
    type Target = SamplerCore;

    fn deref(&self) -> &SamplerCore {
        &self.0
    }
}

impl DerefMut for Sampler {
    fn deref_mut(&mut self) -> &mut SamplerCore {
        &mut self.0
    }
}
