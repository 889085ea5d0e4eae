/// Instrument types
///
/// Each constant represents one of the supported instrument categories.

/// Listed company share.
pub const INSTRUMENT_TYPE_STOCK: &str = "STOCK";

/// Real estate investment trust share.
pub const INSTRUMENT_TYPE_REIT: &str = "REIT";

/// Bond, treasury note or other fixed-income paper.
pub const INSTRUMENT_TYPE_FIXED_INCOME: &str = "FIXED_INCOME";

/// Crypto asset.
pub const INSTRUMENT_TYPE_CRYPTO: &str = "CRYPTO";

/// Exchange traded fund share.
pub const INSTRUMENT_TYPE_ETF: &str = "ETF";

/// Anything that does not fit the categories above.
pub const INSTRUMENT_TYPE_OTHER: &str = "OTHER";

/// Instrument types accepted at registration
pub const SUPPORTED_INSTRUMENT_TYPES: [&str; 6] = [
    INSTRUMENT_TYPE_STOCK,
    INSTRUMENT_TYPE_REIT,
    INSTRUMENT_TYPE_FIXED_INCOME,
    INSTRUMENT_TYPE_CRYPTO,
    INSTRUMENT_TYPE_ETF,
    INSTRUMENT_TYPE_OTHER,
];
