//! Static index reference data and lookup

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

/// Which return estimate of an [`IndexRecord`] feeds the fused score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ReturnBasis {
    #[default]
    #[serde(rename = "capm")]
    Capm,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Display for ReturnBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReturnBasis::Capm => "CAPM_6m",
                ReturnBasis::ThreeMonths => "E[R] 3M",
                ReturnBasis::SixMonths => "E[R] 6M",
                ReturnBasis::OneYear => "E[R] 1Y",
            }
        )
    }
}

impl FromStr for ReturnBasis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "capm" => Ok(ReturnBasis::Capm),
            "3m" => Ok(ReturnBasis::ThreeMonths),
            "6m" => Ok(ReturnBasis::SixMonths),
            "1y" => Ok(ReturnBasis::OneYear),
            _ => Err(anyhow::anyhow!(
                "Invalid return basis: {s} (expected one of capm, 3m, 6m, 1y)"
            )),
        }
    }
}

impl TryFrom<String> for ReturnBasis {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl ReturnBasis {
    /// Periods shown in the expected returns overview, shortest first.
    pub const PERIODS: [ReturnBasis; 3] = [
        ReturnBasis::ThreeMonths,
        ReturnBasis::SixMonths,
        ReturnBasis::OneYear,
    ];
}

/// Per-period expected returns, as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturns {
    pub three_months: f64,
    pub six_months: f64,
    pub one_year: f64,
}

/// Immutable reference data for a single market index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub name: String,
    pub capm: f64,
    pub probability_up: f64,
    pub period_returns: Option<PeriodReturns>,
}

impl IndexRecord {
    /// Expected return for the given basis. Records without period data fall
    /// back to the CAPM estimate.
    pub fn expected_return(&self, basis: ReturnBasis) -> f64 {
        match (basis, &self.period_returns) {
            (ReturnBasis::Capm, _) | (_, None) => self.capm,
            (ReturnBasis::ThreeMonths, Some(p)) => p.three_months,
            (ReturnBasis::SixMonths, Some(p)) => p.six_months,
            (ReturnBasis::OneYear, Some(p)) => p.one_year,
        }
    }
}

/// Read-only, name-keyed table of index records.
///
/// Insertion order is kept so listings and the overview follow the order the
/// records were defined in.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    records: Vec<IndexRecord>,
    by_name: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Builds a table from records. A later record with an existing name
    /// replaces the earlier one in place.
    pub fn from_records(records: impl IntoIterator<Item = IndexRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.upsert(record);
        }
        table
    }

    /// The built-in table of ten market indices.
    pub fn builtin() -> &'static ReferenceTable {
        &BUILTIN
    }

    /// Returns a copy of this table extended with `records`.
    pub fn extended(&self, records: impl IntoIterator<Item = IndexRecord>) -> Self {
        let mut table = self.clone();
        for record in records {
            table.upsert(record);
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&IndexRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn upsert(&mut self, record: IndexRecord) {
        match self.by_name.get(&record.name) {
            Some(&i) => self.records[i] = record,
            None => {
                self.by_name.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }
}

// (name, capm 6m, probability up, 3m, 6m, 1y)
const BUILTIN_DATA: [(&str, f64, f64, f64, f64, f64); 10] = [
    ("ASX 200", 0.1846876688037084, 0.5308, 0.088711049, 0.184687669, 0.400846687),
    ("CAC 40", 0.16959831188935687, 0.4886, 0.081490585, 0.169598312, 0.367857255),
    ("CSI 300", 0.2356578644530229, 0.5230, 0.113100985, 0.235657864, 0.512281377),
    ("DAX", 0.17349152032188458, 0.5095, 0.083353539, 0.17349152, 0.376368866),
    ("FTSE 100", 0.14414575331498228, 0.4917, 0.069311188, 0.144145753, 0.31221105),
    ("HSI", 0.16824947417296285, 0.3629, 0.080845148, 0.168249474, 0.36490833),
    ("IDX Composite", 0.13109431524472048, 0.5290, 0.063065897, 0.131094315, 0.283677062),
    ("KOSPI", 0.19769410180178457, 0.4117, 0.094934805, 0.197694102, 0.429282282),
    ("NIKKEI 225", 0.1472031516218701, 0.6274, 0.070774195, 0.147203152, 0.318895353),
    ("S&P 500", 0.13942497472444942, 0.9975, 0.067052231, 0.139424975, 0.301890146),
];

static BUILTIN: LazyLock<ReferenceTable> = LazyLock::new(|| {
    ReferenceTable::from_records(BUILTIN_DATA.iter().map(
        |&(name, capm, probability_up, three_months, six_months, one_year)| IndexRecord {
            name: name.to_string(),
            capm,
            probability_up,
            period_returns: Some(PeriodReturns {
                three_months,
                six_months,
                one_year,
            }),
        },
    ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_ten_indices() {
        let table = ReferenceTable::builtin();
        assert_eq!(table.len(), 10);
        assert_eq!(table.names().next(), Some("ASX 200"));
        assert_eq!(table.names().last(), Some("S&P 500"));

        let spx = table.get("S&P 500").unwrap();
        assert_eq!(spx.capm, 0.13942497472444942);
        assert_eq!(spx.probability_up, 0.9975);
        assert!(table.get("Dow Jones").is_none());
    }

    #[test]
    fn test_builtin_records_are_in_range() {
        for record in ReferenceTable::builtin().records() {
            assert!(record.capm > 0.0, "{} capm", record.name);
            assert!(
                (0.0..=1.0).contains(&record.probability_up),
                "{} probability",
                record.name
            );
        }
    }

    #[test]
    fn test_expected_return_by_basis() {
        let dax = ReferenceTable::builtin().get("DAX").unwrap();
        assert_eq!(dax.expected_return(ReturnBasis::Capm), 0.17349152032188458);
        assert_eq!(dax.expected_return(ReturnBasis::ThreeMonths), 0.083353539);
        assert_eq!(dax.expected_return(ReturnBasis::SixMonths), 0.17349152);
        assert_eq!(dax.expected_return(ReturnBasis::OneYear), 0.376368866);

        let custom = IndexRecord {
            name: "Custom".to_string(),
            capm: 0.1,
            probability_up: 0.5,
            period_returns: None,
        };
        assert_eq!(custom.expected_return(ReturnBasis::OneYear), 0.1);
    }

    #[test]
    fn test_extended_overrides_and_appends() {
        let base = ReferenceTable::builtin();
        let table = base.extended(vec![
            IndexRecord {
                name: "DAX".to_string(),
                capm: 0.2,
                probability_up: 0.4,
                period_returns: None,
            },
            IndexRecord {
                name: "Bovespa".to_string(),
                capm: 0.12,
                probability_up: 0.55,
                period_returns: None,
            },
        ]);

        assert_eq!(table.len(), 11);
        assert_eq!(table.get("DAX").unwrap().capm, 0.2);
        assert_eq!(table.names().nth(3), Some("DAX"));
        assert_eq!(table.names().last(), Some("Bovespa"));
        // Built-in table is untouched
        assert_eq!(base.len(), 10);
        assert_eq!(base.get("DAX").unwrap().capm, 0.17349152032188458);
    }

    #[test]
    fn test_return_basis_from_str() {
        assert_eq!("CAPM".parse::<ReturnBasis>().unwrap(), ReturnBasis::Capm);
        assert_eq!("3m".parse::<ReturnBasis>().unwrap(), ReturnBasis::ThreeMonths);
        assert_eq!("6M".parse::<ReturnBasis>().unwrap(), ReturnBasis::SixMonths);
        assert_eq!("1y".parse::<ReturnBasis>().unwrap(), ReturnBasis::OneYear);
        assert!("2y".parse::<ReturnBasis>().is_err());
    }

    #[test]
    fn test_return_basis_serde_tokens() {
        let basis: ReturnBasis = serde_yaml::from_str("\"1Y\"").unwrap();
        assert_eq!(basis, ReturnBasis::OneYear);
        assert_eq!(
            serde_yaml::to_string(&ReturnBasis::ThreeMonths).unwrap().trim(),
            "3m"
        );
    }
}
