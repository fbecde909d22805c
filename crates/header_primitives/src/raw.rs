use serde::Deserialize;

use crate::{Header, parse};

/// Reasons a header cannot be built from its ingestion or persisted form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidHeaderError {
    /// A mandatory field was not supplied.
    #[error("missing {0}")]
    Missing(&'static str),

    /// A field was supplied with the wrong width or encoding.
    #[error("invalid {field}: {reason}")]
    Malformed {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// A header as it arrives from an ingestion source.
///
/// The field names follow the Ethereum JSON-RPC block object, so the result of
/// `eth_getBlockByNumber(n, false)` deserializes directly; unknown fields such as
/// `transactions` or `totalDifficulty` are ignored. Nothing is validated until
/// the conversion into [`Header`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHeader {
    pub hash: Option<String>,
    pub parent_hash: Option<String>,
    #[serde(rename = "sha3Uncles")]
    pub sha3_uncles: Option<String>,
    /// Some clients name the uncles hash this way instead of, or as well as, `sha3Uncles`.
    pub uncles_hash: Option<String>,
    pub miner: Option<String>,
    /// Parity-derived clients send `author` next to `miner`; used only when `miner` is absent.
    pub author: Option<String>,
    pub state_root: Option<String>,
    pub transactions_root: Option<String>,
    pub receipts_root: Option<String>,
    pub number: Option<String>,
    pub gas_used: Option<String>,
    pub gas_limit: Option<String>,
    pub extra_data: Option<String>,
    pub logs_bloom: Option<String>,
    pub timestamp: Option<String>,
    pub difficulty: Option<String>,
    pub size: Option<String>,
    pub mix_hash: Option<String>,
    pub nonce: Option<String>,
    pub base_fee_per_gas: Option<String>,
}

fn required<'a>(
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, InvalidHeaderError> {
    value.as_deref().ok_or(InvalidHeaderError::Missing(field))
}

fn required_either<'a>(
    field: &'static str,
    value: &'a Option<String>,
    fallback: &'a Option<String>,
) -> Result<&'a str, InvalidHeaderError> {
    value
        .as_deref()
        .or(fallback.as_deref())
        .ok_or(InvalidHeaderError::Missing(field))
}

impl TryFrom<&RawHeader> for Header {
    type Error = InvalidHeaderError;

    fn try_from(raw: &RawHeader) -> Result<Self, Self::Error> {
        let base_fee_per_gas = raw
            .base_fee_per_gas
            .as_deref()
            .map(|fee| parse::quantity("base_fee_per_gas", fee))
            .transpose()?;

        Ok(Self {
            hash: parse::h256("hash", required("hash", &raw.hash)?)?,
            parent_hash: parse::h256("parent_hash", required("parent_hash", &raw.parent_hash)?)?,
            uncles_hash: parse::h256(
                "uncles_hash",
                required_either("uncles_hash", &raw.sha3_uncles, &raw.uncles_hash)?,
            )?,
            author: parse::address(
                "author",
                required_either("author", &raw.miner, &raw.author)?,
            )?,
            state_root: parse::h256("state_root", required("state_root", &raw.state_root)?)?,
            transactions_root: parse::h256(
                "transactions_root",
                required("transactions_root", &raw.transactions_root)?,
            )?,
            receipts_root: parse::h256(
                "receipts_root",
                required("receipts_root", &raw.receipts_root)?,
            )?,
            number: parse::quantity("number", required("number", &raw.number)?)?,
            gas_used: parse::quantity("gas_used", required("gas_used", &raw.gas_used)?)?,
            gas_limit: parse::quantity("gas_limit", required("gas_limit", &raw.gas_limit)?)?,
            extra_data: parse::bytes("extra_data", required("extra_data", &raw.extra_data)?)?,
            logs_bloom: parse::bloom("logs_bloom", required("logs_bloom", &raw.logs_bloom)?)?,
            timestamp: parse::quantity("timestamp", required("timestamp", &raw.timestamp)?)?,
            difficulty: parse::big_quantity(
                "difficulty",
                required("difficulty", &raw.difficulty)?,
            )?,
            size: parse::quantity("size", required("size", &raw.size)?)?,
            mix_hash: parse::h256("mix_hash", required("mix_hash", &raw.mix_hash)?)?,
            nonce: parse::h64("nonce", required("nonce", &raw.nonce)?)?,
            base_fee_per_gas,
        })
    }
}

impl TryFrom<RawHeader> for Header {
    type Error = InvalidHeaderError;

    fn try_from(raw: RawHeader) -> Result<Self, Self::Error> {
        Self::try_from(&raw)
    }
}

impl From<&Header> for RawHeader {
    fn from(header: &Header) -> Self {
        Self {
            hash: Some(parse::to_hex(&header.hash)),
            parent_hash: Some(parse::to_hex(&header.parent_hash)),
            sha3_uncles: Some(parse::to_hex(&header.uncles_hash)),
            uncles_hash: None,
            miner: Some(parse::to_hex(&header.author)),
            author: None,
            state_root: Some(parse::to_hex(&header.state_root)),
            transactions_root: Some(parse::to_hex(&header.transactions_root)),
            receipts_root: Some(parse::to_hex(&header.receipts_root)),
            number: Some(format!("{:#x}", header.number)),
            gas_used: Some(format!("{:#x}", header.gas_used)),
            gas_limit: Some(format!("{:#x}", header.gas_limit)),
            extra_data: Some(format!("0x{}", hex::encode(&header.extra_data))),
            logs_bloom: Some(parse::to_hex(&header.logs_bloom)),
            timestamp: Some(format!("{:#x}", header.timestamp)),
            difficulty: Some(header.difficulty.to_string()),
            size: Some(format!("{:#x}", header.size)),
            mix_hash: Some(parse::to_hex(&header.mix_hash)),
            nonce: Some(parse::to_hex(&header.nonce)),
            base_fee_per_gas: header.base_fee_per_gas.map(|fee| format!("{fee:#x}")),
        }
    }
}
