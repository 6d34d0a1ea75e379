//! JSON‑deserializable channel map description.
//!
//! These types describe where each channel lives inside a record. They are intended to be
//! loaded from a configuration file shipped with an acquisition setup and then compiled into a
//! [crate::channel::ChannelMap].

use serde::{Deserialize, Serialize};

use crate::{
    channel::{AnalogEncoding, Channel, ChannelKind, ChannelMap},
    errors::ViewError,
};

/// Top‑level definition: the list of channels in a record.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChannelMapDef {
    pub channels: Vec<ChannelDef>,
}

/// Description of a single channel.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChannelDef {
    /// Key in the decoded output map.
    pub name: String,
    pub kind: ChannelKindDef,
}

/// Kind of channel, tagged by `"type"`.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum ChannelKindDef {
    /// A single bit per record.
    Logic { bit: usize },
    /// Bits `start..end` of each record, decoded through `encoding`.
    Analog {
        start: usize,
        end: usize,
        #[serde(default)]
        encoding: EncodingDef,
    },
}

/// Analog encoding parameters. Every field is optional in JSON.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EncodingDef {
    pub scale: f64,
    pub offset: f64,
    pub signed: bool,
    pub floating: bool,
    pub big_endian: bool,
}

impl Default for EncodingDef {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
            signed: true,
            floating: false,
            big_endian: false,
        }
    }
}

impl From<ChannelDef> for Channel {
    fn from(value: ChannelDef) -> Self {
        match value.kind {
            ChannelKindDef::Logic { bit } => Channel::logic(value.name, bit),
            ChannelKindDef::Analog {
                start,
                end,
                encoding,
            } => Channel {
                name: value.name,
                kind: ChannelKind::Analog {
                    bits: start..end,
                    encoding: AnalogEncoding {
                        bits: end.saturating_sub(start),
                        scale: encoding.scale,
                        offset: encoding.offset,
                        signed: encoding.signed,
                        floating: encoding.floating,
                        big_endian: encoding.big_endian,
                    },
                },
            },
        }
    }
}

impl TryFrom<ChannelMapDef> for ChannelMap {
    type Error = ViewError;

    fn try_from(value: ChannelMapDef) -> Result<Self, Self::Error> {
        let channels: Vec<Channel> = value.channels.into_iter().map(Into::into).collect();
        ChannelMap::compile(&channels)
    }
}
