use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{DateError, SheetError};

/// Default VAT rate applied to a fresh working item.
pub const DEFAULT_RATE: f64 = 0.20;

/// One expense line item.
///
/// The amounts are kept mutually consistent by the setters:
/// `gross = cost + vat`, and `cost = gross / (1 + rate)` when the rate is
/// positive. There is no single source-of-truth field; whichever setter
/// fires last determines the values. All arithmetic is plain `f64` and no
/// rounding happens here; two-decimal rounding is a display concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub date: NaiveDate,
    pub desc: String,
    pub rate: f64,
    pub cost: f64,
    pub vat: f64,
    pub gross: f64,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            desc: String::new(),
            rate: DEFAULT_RATE,
            cost: 0.0,
            vat: 0.0,
            gross: 0.0,
        }
    }
}

impl LineItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the synthetic totals row shown under a sheet. The sums are
    /// stored verbatim; no derivation runs.
    pub fn totals(cost: f64, vat: f64, gross: f64) -> Self {
        Self {
            date: NaiveDate::default(),
            desc: String::new(),
            rate: 0.0,
            cost,
            vat,
            gross,
        }
    }

    /// Applies a date spec: `today`, `+N`/`-N` day shifts, or a literal
    /// `YYYY-MM-DD`. Shifts past today's date and malformed literals are
    /// rejected with the date left unchanged; any other token is a silent
    /// no-op.
    pub fn set_date(&mut self, spec: &str) -> Result<(), DateError> {
        if let Some(date) = apply_date_spec(self.date, spec, Local::now().date_naive())? {
            self.date = date;
        }
        Ok(())
    }

    pub fn set_desc(&mut self, text: &str) {
        self.desc = text.to_string();
    }

    /// Sets the tax rate and recomputes cost and vat from the current gross.
    /// A value strictly between 1 and 100 is read as a percentage.
    pub fn set_rate(&mut self, raw: &str) -> Result<(), SheetError> {
        let mut rate = parse_amount(raw)?;
        if rate > 1.0 && rate < 100.0 {
            rate /= 100.0;
        }
        self.rate = rate;
        self.cost = self.gross / (1.0 + self.rate);
        self.vat = self.gross - self.cost;
        Ok(())
    }

    /// Sets the gross amount and recomputes cost and vat from the current
    /// rate.
    pub fn set_gross(&mut self, raw: &str) -> Result<(), SheetError> {
        self.gross = parse_amount(raw)?;
        self.cost = if self.rate > 0.0 {
            self.gross / (1.0 + self.rate)
        } else {
            self.gross
        };
        self.vat = self.gross - self.cost;
        Ok(())
    }

    /// Sets the net cost and recomputes gross and vat from the current rate.
    pub fn set_cost(&mut self, raw: &str) -> Result<(), SheetError> {
        self.cost = parse_amount(raw)?;
        self.gross = self.cost * (1.0 + self.rate);
        self.vat = self.gross - self.cost;
        Ok(())
    }
}

fn parse_amount(raw: &str) -> Result<f64, SheetError> {
    let trimmed = raw.trim();
    trimmed
        .parse()
        .map_err(|_| SheetError::ParseNumber(trimmed.to_string()))
}

/// Resolves a date spec against the item's current date. `Ok(None)` means
/// the spec matched none of the recognized forms and the date stays as-is.
fn apply_date_spec(
    current: NaiveDate,
    spec: &str,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, DateError> {
    let spec = spec.trim();

    if spec == "today" {
        return Ok(Some(today));
    }

    if let Some(days) = day_shift(spec, '+') {
        let shifted = current
            .checked_add_days(Days::new(days))
            .ok_or(DateError::FutureDate)?;
        if shifted > today {
            return Err(DateError::FutureDate);
        }
        return Ok(Some(shifted));
    }

    if let Some(days) = day_shift(spec, '-') {
        let shifted = current
            .checked_sub_days(Days::new(days))
            .ok_or(DateError::TooFarBack)?;
        return Ok(Some(shifted));
    }

    if let Some(parsed) = literal_date(spec) {
        return parsed.map(Some);
    }

    Ok(None)
}

fn day_shift(spec: &str, sign: char) -> Option<u64> {
    let digits = spec.strip_prefix(sign)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // A count too large for u64 is certainly out of calendar range.
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Matches `YYYY-M-D` literals (one or two digit month and day). A token
/// that fits the shape but names an impossible date is a format error; a
/// token of any other shape is not a date spec at all.
fn literal_date(spec: &str) -> Option<Result<NaiveDate, DateError>> {
    let mut parts = spec.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if year.len() != 4 || !(1..=2).contains(&month.len()) || !(1..=2).contains(&day.len()) {
        return None;
    }
    if ![year, month, day]
        .iter()
        .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    Some(match (year.parse(), month.parse(), day.parse()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d).ok_or(DateError::Format),
        _ => Err(DateError::Format),
    })
}
