/// Transaction kinds
///
/// Each constant represents one of the supported ledger entry categories.

/// Purchase of an instrument. Increases quantity and invested capital.
pub const TRANSACTION_KIND_BUY: &str = "BUY";

/// Disposal of an instrument. Decreases quantity and releases invested
/// capital at the running average cost.
pub const TRANSACTION_KIND_SELL: &str = "SELL";

/// Cash dividend paid out for a held instrument.
pub const TRANSACTION_KIND_DIVIDEND: &str = "DIVIDEND";

/// Interest credited for a fixed-income instrument.
pub const TRANSACTION_KIND_INTEREST: &str = "INTEREST";

/// Periodic fund yield (e.g. REIT distributions).
pub const TRANSACTION_KIND_YIELD: &str = "YIELD";

/// Shares granted by the issuer at no cost.
pub const TRANSACTION_KIND_BONUS_SHARES: &str = "BONUS_SHARES";

/// Stock split increasing the share count.
pub const TRANSACTION_KIND_SPLIT: &str = "SPLIT";

/// Reverse split decreasing the share count.
pub const TRANSACTION_KIND_REVERSE_SPLIT: &str = "REVERSE_SPLIT";

/// Kinds that remove quantity from a position and are gated against the
/// currently held amount.
pub const REDUCING_TRANSACTION_KINDS: [&str; 2] =
    [TRANSACTION_KIND_SELL, TRANSACTION_KIND_REVERSE_SPLIT];

/// Kinds that record income without touching quantity or cost basis.
pub const INCOME_TRANSACTION_KINDS: [&str; 3] = [
    TRANSACTION_KIND_DIVIDEND,
    TRANSACTION_KIND_INTEREST,
    TRANSACTION_KIND_YIELD,
];

/// Kinds originating from issuer corporate actions.
pub const CORPORATE_ACTION_TRANSACTION_KINDS: [&str; 3] = [
    TRANSACTION_KIND_BONUS_SHARES,
    TRANSACTION_KIND_SPLIT,
    TRANSACTION_KIND_REVERSE_SPLIT,
];
