//! Named channels carved out of fixed-size records.
//!
//! A [ChannelMap] describes where each channel lives inside a record: a logic channel is a
//! single bit, an analog channel a run of bits decoded through an [AnalogEncoding]. Decoding a
//! [Records] buffer yields one [Samples] sequence per channel.

use std::{
    collections::{BTreeMap, HashSet},
    ops::Range,
};

use crate::{
    bits::{sign_extend, swap_bytes_n},
    errors::{Result, ViewError},
    index::Index,
    record::Records,
    view::BitView,
};

/// How the raw bits of an analog field map to a sample value.
///
/// Decoded samples are `raw * scale + offset`.
///
/// # Example
///
/// ```
/// use bitview::channel::AnalogEncoding;
/// use bitview::view::BitView;
///
/// let mut encoding = AnalogEncoding::new(8);
/// encoding.set_scale(0.5).set_offset(1.0);
///
/// let view = BitView::new(vec![0xfeu8, 0x04], 0, [2, 8], [8, 1]).unwrap();
/// assert_eq!(encoding.decode(&view).unwrap(), vec![0.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogEncoding {
    /// Field width in bits.
    pub bits: usize,
    pub scale: f64,
    pub offset: f64,
    /// Interpret integers as two's complement. Ignored when `floating` is set.
    pub signed: bool,
    /// Interpret the field as an IEEE 754 float (32 or 64 bits).
    pub floating: bool,
    /// The field's bytes are stored most significant first.
    pub big_endian: bool,
}

impl AnalogEncoding {
    /// Signed, little-endian integer encoding with unit scale and no offset.
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            scale: 1.0,
            offset: 0.0,
            signed: true,
            floating: false,
            big_endian: false,
        }
    }

    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_offset(&mut self, offset: f64) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn set_signed(&mut self, signed: bool) -> &mut Self {
        self.signed = signed;
        self
    }

    pub fn set_floating(&mut self, floating: bool) -> &mut Self {
        self.floating = floating;
        self
    }

    pub fn set_big_endian(&mut self, big_endian: bool) -> &mut Self {
        self.big_endian = big_endian;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || !self.offset.is_finite() {
            return Err(ViewError::InvalidArgument("scale and offset must be finite"));
        }
        if self.bits == 0 || self.bits > 64 {
            return Err(ViewError::UnsupportedWidth { bits: self.bits });
        }
        if self.floating && self.bits != 32 && self.bits != 64 {
            return Err(ViewError::UnsupportedWidth { bits: self.bits });
        }
        if self.big_endian && self.bits % 8 != 0 {
            return Err(ViewError::UnsupportedWidth { bits: self.bits });
        }

        Ok(())
    }

    /// Decodes every innermost field of `view` into a scaled sample.
    pub fn decode(&self, view: &BitView) -> Result<Vec<f64>> {
        self.validate()?;

        if view.shape().last() != Some(self.bits) {
            return Err(ViewError::InvalidArgument(
                "field width does not match encoding",
            ));
        }

        let raw: Vec<f64> = if self.big_endian {
            view.to_unsigned()?
                .into_vec()
                .into_iter()
                .map(|v| self.interpret(swap_bytes_n(v, self.bits / 8)))
                .collect()
        } else if self.floating {
            view.to_float()?.into_vec()
        } else if self.signed {
            view.to_signed()?
                .into_vec()
                .into_iter()
                .map(|v| v as f64)
                .collect()
        } else {
            view.to_unsigned()?
                .into_vec()
                .into_iter()
                .map(|v| v as f64)
                .collect()
        };

        Ok(raw
            .into_iter()
            .map(|v| v * self.scale + self.offset)
            .collect())
    }

    /// Interprets an already byte-ordered raw field value.
    fn interpret(&self, raw: u64) -> f64 {
        match (self.floating, self.bits) {
            (true, 32) => f32::from_bits(raw as u32) as f64,
            (true, _) => f64::from_bits(raw),
            (false, bits) if self.signed => sign_extend(raw, bits) as f64,
            (false, _) => raw as f64,
        }
    }
}

/// A single named channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Key used in the decoded result map.
    pub name: String,
    pub kind: ChannelKind,
}

/// Where a channel's bits live within a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelKind {
    /// One bit per record.
    Logic { bit: usize },
    /// A run of bits per record, decoded through `encoding`.
    Analog {
        bits: Range<usize>,
        encoding: AnalogEncoding,
    },
}

impl Channel {
    pub fn logic(name: impl Into<String>, bit: usize) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Logic { bit },
        }
    }

    pub fn analog(name: impl Into<String>, bits: Range<usize>, encoding: AnalogEncoding) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Analog { bits, encoding },
        }
    }

    /// Exclusive end of the channel's bits within a record.
    fn end_bit(&self) -> usize {
        match &self.kind {
            ChannelKind::Logic { bit } => bit + 1,
            ChannelKind::Analog { bits, .. } => bits.end,
        }
    }
}

/// Decoded samples of one channel, one per record.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Logic(Vec<bool>),
    Analog(Vec<f64>),
}

/// A validated set of channels. Build with [ChannelMap::compile], then [ChannelMap::decode]
/// record buffers.
#[derive(Debug, Clone)]
pub struct ChannelMap {
    /// Channels in definition order.
    pub channels: Vec<Channel>,
}

impl ChannelMap {
    /// Validates `channels`: names must be non-empty and unique, analog ranges non-empty and as
    /// wide as their encoding.
    pub fn compile(channels: &[Channel]) -> Result<Self> {
        let mut names = HashSet::with_capacity(channels.len());

        for channel in channels {
            if channel.name.is_empty() {
                return Err(ViewError::InvalidArgument("channel name is empty"));
            }
            if !names.insert(channel.name.as_str()) {
                return Err(ViewError::InvalidArgument("duplicate channel name"));
            }

            if let ChannelKind::Analog { bits, encoding } = &channel.kind {
                if bits.is_empty() {
                    return Err(ViewError::InvalidArgument("analog channel has no bits"));
                }
                if bits.len() != encoding.bits {
                    return Err(ViewError::InvalidArgument(
                        "analog bit range does not match encoding width",
                    ));
                }
                encoding.validate()?;
            }
        }

        log::debug!("compiled channel map with {} channels", channels.len());

        Ok(Self {
            channels: channels.to_vec(),
        })
    }

    /// Smallest record width, in bits, that holds every channel.
    pub fn min_record_bits(&self) -> usize {
        self.channels.iter().map(Channel::end_bit).max().unwrap_or(0)
    }

    /// Decodes every channel from `records`. Fails if a channel extends past the record width.
    pub fn decode(&self, records: &Records) -> Result<BTreeMap<String, Samples>> {
        let unit_bits = records.unit_size() * 8;
        let mut out = BTreeMap::new();

        for channel in &self.channels {
            let end = channel.end_bit();
            if end > unit_bits {
                return Err(ViewError::OutOfBounds {
                    bit: end - 1,
                    len_bits: unit_bits,
                });
            }

            let samples = decode_channel(records.bits(), &channel.kind)?;
            out.insert(channel.name.clone(), samples);
        }

        Ok(out)
    }
}

fn decode_channel(bits: &BitView, kind: &ChannelKind) -> Result<Samples> {
    match kind {
        ChannelKind::Logic { bit } => {
            let column = bits.slice(&[Index::from(..), Index::Point(*bit as isize)])?;
            Ok(Samples::Logic(column.to_bits()?.into_vec()))
        }
        ChannelKind::Analog { bits: range, encoding } => {
            let field = bits.slice(&[
                Index::from(..),
                Index::from(range.start as isize..range.end as isize),
            ])?;
            Ok(Samples::Analog(encoding.decode(&field)?))
        }
    }
}
