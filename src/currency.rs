use std::collections::HashMap;

use crate::data_models::{DetailSalary, Salary};

/// Currency the API assumes when a salary carries no code.
pub const SOURCE_DEFAULT_CURRENCY: &str = "BYR";

/// Static conversion table into a single reporting currency.
///
/// Codes not in the table keep their label and are converted at rate 1.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    reporting: String,
    rates: HashMap<String, f64>,
}

impl CurrencyTable {
    pub fn new(reporting: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self {
            reporting: reporting.into(),
            rates,
        }
    }

    pub fn reporting(&self) -> &str {
        &self.reporting
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Converts the source salary block. Zero, negative and missing bounds
    /// come out as `None`.
    pub fn normalize(&self, salary: Option<&DetailSalary>) -> Salary {
        let code = salary
            .and_then(|s| s.currency.as_deref())
            .unwrap_or(SOURCE_DEFAULT_CURRENCY);
        let (rate, currency) = match self.rate(code) {
            Some(rate) => (rate, self.reporting.clone()),
            None => (1.0, code.to_string()),
        };
        let convert = |bound: Option<f64>| bound.filter(|v| *v > 0.0).map(|v| v * rate);

        Salary {
            lower_bound: convert(salary.and_then(|s| s.from)),
            upper_bound: convert(salary.and_then(|s| s.to)),
            currency,
            gross: salary.and_then(|s| s.gross).unwrap_or(false),
        }
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::new(
            "BYN",
            HashMap::from([
                ("USD".to_string(), 3.1),
                ("EUR".to_string(), 3.5),
                ("RUR".to_string(), 0.033),
            ]),
        )
    }
}
