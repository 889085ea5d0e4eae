//! Tests for transaction domain models.

#[cfg(test)]
mod tests {
    use crate::ledger::ledger_model::*;
    use crate::ledger::LedgerError;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    // ============================================================================
    // TransactionKind Tests
    // ============================================================================

    #[test]
    fn test_transaction_kind_buy_as_str() {
        use crate::ledger::ledger_constants::TRANSACTION_KIND_BUY;
        let kind = TransactionKind::Buy;
        assert_eq!(kind.as_str(), TRANSACTION_KIND_BUY);
    }

    #[test]
    fn test_transaction_kind_bonus_shares_as_str() {
        use crate::ledger::ledger_constants::TRANSACTION_KIND_BONUS_SHARES;
        let kind = TransactionKind::BonusShares;
        assert_eq!(kind.as_str(), TRANSACTION_KIND_BONUS_SHARES);
    }

    #[test]
    fn test_transaction_kind_from_str_sell() {
        let kind = TransactionKind::from_str("SELL").unwrap();
        assert_eq!(kind, TransactionKind::Sell);
    }

    #[test]
    fn test_transaction_kind_from_str_reverse_split() {
        let kind = TransactionKind::from_str("REVERSE_SPLIT").unwrap();
        assert_eq!(kind, TransactionKind::ReverseSplit);
    }

    #[test]
    fn test_transaction_kind_from_str_invalid() {
        let result = TransactionKind::from_str("TRANSFER");
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_kind_from_str_rejects_lowercase() {
        let result = TransactionKind::from_str("buy");
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_kind_serialization_buy() {
        let kind = TransactionKind::Buy;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#""BUY""#);
    }

    #[test]
    fn test_transaction_kind_serialization_bonus_shares() {
        let kind = TransactionKind::BonusShares;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#""BONUS_SHARES""#);
    }

    #[test]
    fn test_transaction_kind_serialization_reverse_split() {
        let kind = TransactionKind::ReverseSplit;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#""REVERSE_SPLIT""#);
    }

    #[test]
    fn test_transaction_kind_deserialization() {
        let dividend: TransactionKind = serde_json::from_str(r#""DIVIDEND""#).unwrap();
        assert_eq!(dividend, TransactionKind::Dividend);

        let split: TransactionKind = serde_json::from_str(r#""SPLIT""#).unwrap();
        assert_eq!(split, TransactionKind::Split);

        let interest: TransactionKind = serde_json::from_str(r#""INTEREST""#).unwrap();
        assert_eq!(interest, TransactionKind::Interest);
    }

    #[test]
    fn test_transaction_kind_serde_matches_as_str() {
        let kinds = [
            TransactionKind::Buy,
            TransactionKind::Sell,
            TransactionKind::Dividend,
            TransactionKind::Interest,
            TransactionKind::Yield,
            TransactionKind::BonusShares,
            TransactionKind::Split,
            TransactionKind::ReverseSplit,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    // ============================================================================
    // Total Value Tests
    // ============================================================================

    #[test]
    fn test_total_value_buy_adds_fees() {
        let total = TransactionKind::Buy.total_value(dec!(10), dec!(150.50), dec!(5.99));
        assert_eq!(total, dec!(1510.99));
    }

    #[test]
    fn test_total_value_sell_subtracts_fees() {
        let total = TransactionKind::Sell.total_value(dec!(10), dec!(150.50), dec!(5.99));
        assert_eq!(total, dec!(1499.01));
    }

    #[test]
    fn test_total_value_other_kinds_ignore_fees() {
        let dividend = TransactionKind::Dividend.total_value(dec!(10), dec!(1.50), dec!(5.99));
        assert_eq!(dividend, dec!(15));

        let split = TransactionKind::Split.total_value(dec!(10), dec!(0), dec!(5.99));
        assert_eq!(split, dec!(0));
    }

    // ============================================================================
    // NewTransaction Validation Tests
    // ============================================================================

    fn create_test_new_transaction() -> NewTransaction {
        NewTransaction {
            instrument_id: "instrument-1".to_string(),
            kind: "BUY".to_string(),
            quantity: dec!(10),
            unit_price: dec!(150),
            fees: Some(dec!(5)),
            occurred_at: "2024-01-15".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_new_transaction_validation_success() {
        let transaction = create_test_new_transaction();
        assert!(transaction.validate().is_ok());
    }

    #[test]
    fn test_new_transaction_validation_empty_instrument() {
        let mut transaction = create_test_new_transaction();
        transaction.instrument_id = "".to_string();

        let err = transaction.validate().unwrap_err();
        assert!(err.to_string().contains("Instrument ID"));
    }

    #[test]
    fn test_new_transaction_validation_whitespace_instrument() {
        let mut transaction = create_test_new_transaction();
        transaction.instrument_id = "   ".to_string();

        assert!(transaction.validate().is_err());
    }

    #[test]
    fn test_new_transaction_validation_unknown_kind() {
        let mut transaction = create_test_new_transaction();
        transaction.kind = "TRANSFER".to_string();

        let err = transaction.validate().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidData(_)));
    }

    #[test]
    fn test_new_transaction_validation_zero_price_buy() {
        let mut transaction = create_test_new_transaction();
        transaction.unit_price = dec!(0);

        let err = transaction.validate().unwrap_err();
        assert!(err.to_string().contains("strictly positive"));
    }

    #[test]
    fn test_new_transaction_validation_zero_price_dividend() {
        let mut transaction = create_test_new_transaction();
        transaction.kind = "DIVIDEND".to_string();
        transaction.unit_price = dec!(0);

        assert!(transaction.validate().is_ok());
    }

    #[test]
    fn test_new_transaction_validation_negative_price_dividend() {
        let mut transaction = create_test_new_transaction();
        transaction.kind = "DIVIDEND".to_string();
        transaction.unit_price = dec!(-1);

        let err = transaction.validate().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidData(_)));
    }

    #[test]
    fn test_new_transaction_validation_invalid_date_format() {
        let mut transaction = create_test_new_transaction();
        transaction.occurred_at = "invalid-date".to_string();

        let err = transaction.validate().unwrap_err();
        assert!(err.to_string().contains("date format"));
    }

    #[test]
    fn test_new_transaction_validation_rfc3339_date() {
        let mut transaction = create_test_new_transaction();
        transaction.occurred_at = "2024-01-15T10:30:00Z".to_string();

        assert!(transaction.validate().is_ok());
    }

    #[test]
    fn test_new_transaction_fees_default_to_zero() {
        let mut transaction = create_test_new_transaction();
        transaction.fees = None;
        assert_eq!(transaction.fees_or_zero(), Decimal::ZERO);

        transaction.fees = Some(dec!(2.5));
        assert_eq!(transaction.fees_or_zero(), dec!(2.5));
    }

    // ============================================================================
    // Date Parsing Tests
    // ============================================================================

    #[test]
    fn test_plain_date_lands_on_noon_utc() {
        let parsed = parse_transaction_date("2024-01-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_date_preserves_instant() {
        let parsed = parse_transaction_date("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());
    }

    // ============================================================================
    // TransactionPatch Tests
    // ============================================================================

    fn create_test_transaction() -> Transaction {
        Transaction {
            id: "transaction-1".to_string(),
            owner_id: "owner-1".to_string(),
            instrument_id: "instrument-1".to_string(),
            kind: TransactionKind::Buy,
            quantity: dec!(10),
            unit_price: dec!(150.50),
            fees: dec!(5.99),
            total_value: dec!(1510.99),
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            notes: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_defaults_leave_transaction_unchanged() {
        let transaction = create_test_transaction();
        let updated = TransactionPatch::default().apply(&transaction).unwrap();

        assert_eq!(updated.kind, transaction.kind);
        assert_eq!(updated.quantity, transaction.quantity);
        assert_eq!(updated.unit_price, transaction.unit_price);
        assert_eq!(updated.fees, transaction.fees);
        assert_eq!(updated.total_value, transaction.total_value);
        assert_eq!(updated.occurred_at, transaction.occurred_at);
    }

    #[test]
    fn test_patch_merges_fields_and_recomputes_total() {
        let transaction = create_test_transaction();
        let patch = TransactionPatch {
            quantity: Some(dec!(20)),
            ..Default::default()
        };

        let updated = patch.apply(&transaction).unwrap();
        assert_eq!(updated.quantity, dec!(20));
        assert_eq!(updated.unit_price, dec!(150.50));
        assert_eq!(updated.total_value, dec!(3015.99));
    }

    #[test]
    fn test_patch_kind_switches_fee_handling() {
        let transaction = create_test_transaction();
        let patch = TransactionPatch {
            kind: Some("SELL".to_string()),
            ..Default::default()
        };

        let updated = patch.apply(&transaction).unwrap();
        assert_eq!(updated.kind, TransactionKind::Sell);
        assert_eq!(updated.total_value, dec!(1499.01));
    }

    #[test]
    fn test_patch_rejects_zero_quantity() {
        let transaction = create_test_transaction();
        let patch = TransactionPatch {
            quantity: Some(dec!(0)),
            ..Default::default()
        };

        let err = patch.apply(&transaction).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidData(_)));
    }

    #[test]
    fn test_patch_rejects_unknown_kind() {
        let transaction = create_test_transaction();
        let patch = TransactionPatch {
            kind: Some("TRANSFER".to_string()),
            ..Default::default()
        };

        let err = patch.apply(&transaction).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidData(_)));
    }

    #[test]
    fn test_patch_updates_date_and_notes() {
        let transaction = create_test_transaction();
        let patch = TransactionPatch {
            occurred_at: Some("2024-02-01".to_string()),
            notes: Some("rebalanced".to_string()),
            ..Default::default()
        };

        let updated = patch.apply(&transaction).unwrap();
        assert_eq!(updated.occurred_at, Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap());
        assert_eq!(updated.notes, Some("rebalanced".to_string()));
    }

    // ============================================================================
    // Transaction Serialization Tests
    // ============================================================================

    #[test]
    fn test_transaction_serialization_camel_case() {
        let transaction = create_test_transaction();
        let json = serde_json::to_string(&transaction).unwrap();

        // Check that field names are camelCase
        assert!(json.contains("ownerId"));
        assert!(json.contains("instrumentId"));
        assert!(json.contains("unitPrice"));
        assert!(json.contains("totalValue"));
        assert!(json.contains("occurredAt"));
        assert!(json.contains("deletedAt"));
        assert!(json.contains("createdAt"));
        assert!(json.contains("updatedAt"));
        assert!(json.contains(r#""kind":"BUY""#));
    }

    #[test]
    fn test_transaction_deserialization() {
        let json = r#"{
            "id": "transaction-1",
            "ownerId": "owner-1",
            "instrumentId": "instrument-1",
            "kind": "SELL",
            "quantity": "10",
            "unitPrice": "150.50",
            "fees": "5.99",
            "totalValue": "1499.01",
            "occurredAt": "2024-01-15T10:30:00Z",
            "notes": null,
            "deletedAt": null,
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.id, "transaction-1");
        assert_eq!(transaction.owner_id, "owner-1");
        assert_eq!(transaction.kind, TransactionKind::Sell);
        assert_eq!(transaction.quantity, dec!(10));
        assert_eq!(transaction.total_value, dec!(1499.01));
        assert!(transaction.notes.is_none());
        assert!(transaction.deleted_at.is_none());
    }

    #[test]
    fn test_new_transaction_deserialization_defaults_missing_fees() {
        let json = r#"{
            "instrumentId": "instrument-1",
            "kind": "BUY",
            "quantity": "10",
            "unitPrice": "150.50",
            "occurredAt": "2024-01-15"
        }"#;

        let transaction: NewTransaction = serde_json::from_str(json).unwrap();
        assert!(transaction.fees.is_none());
        assert!(transaction.notes.is_none());
        assert_eq!(transaction.fees_or_zero(), Decimal::ZERO);
        assert!(transaction.validate().is_ok());
    }

    // ============================================================================
    // Database Row Conversion Tests
    // ============================================================================

    fn create_test_db_row() -> TransactionDB {
        let noon = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap().naive_utc();
        TransactionDB {
            id: "transaction-1".to_string(),
            owner_id: "owner-1".to_string(),
            instrument_id: "instrument-1".to_string(),
            kind: "BUY".to_string(),
            quantity: "10.5".to_string(),
            unit_price: "150.5".to_string(),
            fees: "0".to_string(),
            total_value: "1580.25".to_string(),
            occurred_at: noon,
            notes: None,
            deleted_at: None,
            created_at: noon,
            updated_at: noon,
        }
    }

    #[test]
    fn test_transaction_from_db_row() {
        let transaction = Transaction::try_from(create_test_db_row()).unwrap();

        assert_eq!(transaction.kind, TransactionKind::Buy);
        assert_eq!(transaction.quantity, dec!(10.5));
        assert_eq!(transaction.total_value, dec!(1580.25));
        assert_eq!(transaction.occurred_at, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
        assert!(transaction.deleted_at.is_none());
    }

    #[test]
    fn test_transaction_from_db_row_rejects_bad_kind() {
        let mut row = create_test_db_row();
        row.kind = "SHORT".to_string();

        let err = Transaction::try_from(row).unwrap_err();
        assert!(matches!(err, LedgerError::DatabaseError(_)));
    }

    #[test]
    fn test_transaction_from_db_row_rejects_bad_decimal() {
        let mut row = create_test_db_row();
        row.quantity = "ten".to_string();

        let err = Transaction::try_from(row).unwrap_err();
        assert!(matches!(err, LedgerError::DatabaseError(_)));
    }

    #[test]
    fn test_transaction_db_row_rounds_stored_amounts() {
        let mut transaction = create_test_transaction();
        transaction.quantity = dec!(1.23456789);

        let row = TransactionDB::from(transaction);
        assert_eq!(row.kind, "BUY");
        assert_eq!(row.quantity, "1.234568");
    }
}
