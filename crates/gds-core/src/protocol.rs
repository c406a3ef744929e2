//! Bus protocol identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::field;

/// Physical/transport protocol of an ECU, tagged by its `protocolid` code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    J1850Vpw,
    J1850Pwm,
    Iso9141,
    Iso14230,
    Can,
    Iso15765,
    SciATrans,
    SciBEngine,
    SciBTrans,
    Iso9141_2,
    BoschBcm,
}

impl Protocol {
    /// Numeric code used by the definition document
    pub fn code(&self) -> u32 {
        match self {
            Protocol::J1850Vpw => 0x01,
            Protocol::J1850Pwm => 0x02,
            Protocol::Iso9141 => 0x03,
            Protocol::Iso14230 => 0x04,
            Protocol::Can => 0x05,
            Protocol::Iso15765 => 0x06,
            Protocol::SciATrans => 0x08,
            Protocol::SciBEngine => 0x09,
            Protocol::SciBTrans => 0x0A,
            Protocol::Iso9141_2 => 0x10001,
            Protocol::BoschBcm => 0x100015,
        }
    }

    /// Look up a protocol by code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x01 => Some(Protocol::J1850Vpw),
            0x02 => Some(Protocol::J1850Pwm),
            0x03 => Some(Protocol::Iso9141),
            0x04 => Some(Protocol::Iso14230),
            0x05 => Some(Protocol::Can),
            0x06 => Some(Protocol::Iso15765),
            0x08 => Some(Protocol::SciATrans),
            0x09 => Some(Protocol::SciBEngine),
            0x0A => Some(Protocol::SciBTrans),
            0x10001 => Some(Protocol::Iso9141_2),
            0x100015 => Some(Protocol::BoschBcm),
            _ => None,
        }
    }

    /// Parse the hex-coded `protocolid` attribute
    pub fn parse(raw: Option<&str>) -> Result<Self, ProtocolError> {
        let code = field::required("protocolid", field::parse_hex("protocolid", raw))?;
        let code = u32::try_from(code).map_err(|_| ProtocolError::Unknown(u32::MAX))?;
        Self::from_code(code).ok_or(ProtocolError::Unknown(code))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Protocol::J1850Vpw => "J1850 VPW",
            Protocol::J1850Pwm => "J1850 PWM",
            Protocol::Iso9141 => "ISO 9141",
            Protocol::Iso14230 => "ISO 14230",
            Protocol::Can => "CAN",
            Protocol::Iso15765 => "ISO 15765",
            Protocol::SciATrans => "SCI-A (transmission)",
            Protocol::SciBEngine => "SCI-B (engine)",
            Protocol::SciBTrans => "SCI-B (transmission)",
            Protocol::Iso9141_2 => "ISO 9141-2",
            Protocol::BoschBcm => "Bosch BCM",
        };
        f.write_str(s)
    }
}
