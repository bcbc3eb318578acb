//! The registered destination entities.
//!
//! Import metadata columns (`ImportBatchId`, `ImportedAtUtc`,
//! `SourceSystem`) are populated by layouts through `constant` and
//! `now` value sources; the parser itself never requires them.

use chrono::{DateTime, NaiveDate, Utc};
use copybook_record::{record, RecordRegistry};
use rust_decimal::Decimal;

record! {
    /// Policy master record, one per line (single mode).
    pub struct Policy("Policy") {
        "PolicyNumber" => policy_number: Option<String>,
        "HolderName" => holder_name: Option<String>,
        "EffectiveDate" => effective_date: Option<NaiveDate>,
        "ExpirationDate" => expiration_date: Option<NaiveDate>,
        "AnnualPremium" => annual_premium: Option<Decimal>,
        "Active" => active: Option<bool>,
        "SourceSystem" => source_system: Option<String>,
        "ImportBatchId" => import_batch_id: Option<String>,
        "ImportedAtUtc" => imported_at_utc: Option<DateTime<Utc>>,
    }
}

record! {
    /// One service line of a claim.
    pub struct ClaimLine("ClaimLine") {
        "LineNumber" => line_number: Option<i64>,
        "ProcedureCode" => procedure_code: Option<String>,
        "ServiceDate" => service_date: Option<NaiveDate>,
        "ChargeAmount" => charge_amount: Option<Decimal>,
        "Units" => units: Option<i64>,
    }
}

record! {
    /// Claim header with its repeating service lines (graph mode).
    pub struct Claim("Claim") {
        "ClaimNumber" => claim_number: Option<String>,
        "PolicyNumber" => policy_number: Option<String>,
        "ReceivedDate" => received_date: Option<NaiveDate>,
        "LineCount" => line_count: Option<i64>,
        "TotalCharge" => total_charge: Option<Decimal>,
        "SourceSystem" => source_system: Option<String>,
        "ImportBatchId" => import_batch_id: Option<String>,
        "ImportedAtUtc" => imported_at_utc: Option<DateTime<Utc>>,
        @collections {
            "Lines" => lines: Vec<ClaimLine> => "ClaimLine",
        }
    }
}

/// Registry holding every importable entity.
pub fn default_registry() -> RecordRegistry {
    let mut registry = RecordRegistry::new();
    registry.register::<Policy>();
    registry.register::<Claim>();
    registry.register::<ClaimLine>();
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolves_all_entities() {
        let registry = default_registry();
        for name in ["Policy", "Claim", "ClaimLine"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_claim_collection_wiring() {
        use copybook_record::Record;
        let descriptor = Claim::record_descriptor();
        let lines = descriptor.collection("Lines").unwrap();
        assert_eq!(lines.child, "ClaimLine");
    }
}
