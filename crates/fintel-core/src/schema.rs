//! Static registry of supported document types and their field schemas.
//!
//! The five document types, their financial line items, and their chart
//! color scales are fixed configuration: created once, never mutated, and
//! not user-extensible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The supported financial document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "Salary Slip")]
    SalarySlip,
    #[serde(rename = "Bank Statement")]
    BankStatement,
    #[serde(rename = "Balance Sheet")]
    BalanceSheet,
    #[serde(rename = "Invoice")]
    Invoice,
    #[serde(rename = "Profit and Loss")]
    ProfitAndLoss,
}

/// Chart color scale hint for a document type.
///
/// Opaque to extraction logic; the presentation layer maps it to an
/// actual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScale {
    Blues,
    Greens,
    Purples,
    Oranges,
    Reds,
}

impl ColorScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScale::Blues => "Blues",
            ColorScale::Greens => "Greens",
            ColorScale::Purples => "Purples",
            ColorScale::Oranges => "Oranges",
            ColorScale::Reds => "Reds",
        }
    }
}

/// Immutable schema for one document type.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSchema {
    /// Human-readable document type name.
    pub name: &'static str,
    /// Financial line items to extract, in display order.
    pub fields: &'static [&'static str],
    /// Display hint for the charting layer.
    pub color_scale: ColorScale,
}

static SALARY_SLIP: DocumentSchema = DocumentSchema {
    name: "Salary Slip",
    fields: &["Basic Salary", "HRA", "DA", "PF", "Net Salary", "Gross Salary"],
    color_scale: ColorScale::Blues,
};

static BANK_STATEMENT: DocumentSchema = DocumentSchema {
    name: "Bank Statement",
    fields: &["Opening Balance", "Closing Balance", "Total Credits", "Total Debits"],
    color_scale: ColorScale::Greens,
};

static BALANCE_SHEET: DocumentSchema = DocumentSchema {
    name: "Balance Sheet",
    fields: &[
        "Total Assets",
        "Total Liabilities",
        "Current Assets",
        "Current Liabilities",
        "Net Worth",
    ],
    color_scale: ColorScale::Purples,
};

static INVOICE: DocumentSchema = DocumentSchema {
    name: "Invoice",
    fields: &["Invoice Amount", "Tax Amount", "Total Amount", "Discount Amount"],
    color_scale: ColorScale::Oranges,
};

static PROFIT_AND_LOSS: DocumentSchema = DocumentSchema {
    name: "Profit and Loss",
    fields: &["Revenue", "Expenses", "Net Profit", "Gross Profit", "Operating Profit"],
    color_scale: ColorScale::Reds,
};

impl DocumentType {
    /// All supported document types, in selector order.
    pub const ALL: [DocumentType; 5] = [
        DocumentType::SalarySlip,
        DocumentType::BankStatement,
        DocumentType::BalanceSheet,
        DocumentType::Invoice,
        DocumentType::ProfitAndLoss,
    ];

    /// Human-readable name of this document type.
    pub fn name(&self) -> &'static str {
        self.schema().name
    }

    /// The field schema for this document type.
    pub fn schema(&self) -> &'static DocumentSchema {
        match self {
            DocumentType::SalarySlip => &SALARY_SLIP,
            DocumentType::BankStatement => &BANK_STATEMENT,
            DocumentType::BalanceSheet => &BALANCE_SHEET,
            DocumentType::Invoice => &INVOICE,
            DocumentType::ProfitAndLoss => &PROFIT_AND_LOSS,
        }
    }

    /// Parse a document type from its human-readable name.
    pub fn parse(name: &str) -> Option<DocumentType> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl DocumentSchema {
    /// Look up a schema by document type name.
    ///
    /// Returns `None` for names outside the enumerated set; callers
    /// surface that as a configuration error.
    pub fn lookup(name: &str) -> Option<&'static DocumentSchema> {
        DocumentType::parse(name).map(|t| t.schema())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DocumentType::parse(s).ok_or_else(|| {
            let names: Vec<&str> = DocumentType::ALL.iter().map(|t| t.name()).collect();
            format!("unknown document type '{}' (expected one of: {})", s, names.join(", "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_type_has_fields_and_color_scale() {
        for doc_type in DocumentType::ALL {
            let schema = doc_type.schema();
            assert!(!schema.fields.is_empty(), "{} has no fields", schema.name);
            assert!(!schema.color_scale.as_str().is_empty());
        }
    }

    #[test]
    fn lookup_by_name() {
        let schema = DocumentSchema::lookup("Invoice").unwrap();
        assert_eq!(schema.fields.len(), 4);
        assert_eq!(schema.color_scale, ColorScale::Oranges);

        assert!(DocumentSchema::lookup("Receipt").is_none());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(DocumentType::parse("salary slip"), Some(DocumentType::SalarySlip));
        assert_eq!(DocumentType::parse(" Profit and Loss "), Some(DocumentType::ProfitAndLoss));
        assert_eq!(DocumentType::parse("ledger"), None);
    }

    #[test]
    fn from_str_reports_known_names() {
        let err = DocumentType::from_str("ledger").unwrap_err();
        assert!(err.contains("Bank Statement"));
    }
}
