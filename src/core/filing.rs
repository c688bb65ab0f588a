use chrono::{Datelike, Days, Duration, Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::transaction::DateRange;

/// Monthly returns are due on this day of the month after the period ends
pub const MONTHLY_DUE_DAY: u32 = 15;

/// Quarterly returns are due on the last day of the month this many months after the period ends
pub const QUARTERLY_DUE_MONTHS: u32 = 1;

/// Annual returns are due on the last day of this month of the following year
pub const ANNUAL_DUE_MONTH: u32 = 3;

/// How often a registrant files and remits
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FilingFrequency {
    Monthly,
    #[default]
    Quarterly,
    Annual,
}

impl FilingFrequency {
    pub fn display(&self) -> &'static str {
        match self {
            FilingFrequency::Monthly => "monthly",
            FilingFrequency::Quarterly => "quarterly",
            FilingFrequency::Annual => "annual",
        }
    }

    /// Length of one filing period in months
    pub fn months(&self) -> u32 {
        match self {
            FilingFrequency::Monthly => 1,
            FilingFrequency::Quarterly => 3,
            FilingFrequency::Annual => 12,
        }
    }

    /// Filing deadline for a period ending on `period_end`, or `None` past
    /// the end of the calendar
    pub fn due_date(&self, period_end: NaiveDate) -> Option<NaiveDate> {
        match self {
            FilingFrequency::Monthly => first_of_month(period_end)
                .checked_add_months(Months::new(1))?
                .checked_add_days(Days::new(u64::from(MONTHLY_DUE_DAY) - 1)),
            FilingFrequency::Quarterly => first_of_month(period_end)
                .checked_add_months(Months::new(QUARTERLY_DUE_MONTHS + 1))?
                .pred_opt(),
            FilingFrequency::Annual => first_of_year(period_end)
                .checked_add_months(Months::new(12 + ANNUAL_DUE_MONTH))?
                .pred_opt(),
        }
    }
}

impl std::fmt::Display for FilingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::str::FromStr for FilingFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(FilingFrequency::Monthly),
            "quarterly" => Ok(FilingFrequency::Quarterly),
            "annual" => Ok(FilingFrequency::Annual),
            other => Err(format!("unknown filing frequency: {other}")),
        }
    }
}

/// A reporting period at a given frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: FilingFrequency,
}

impl FilingPeriod {
    pub fn new(range: DateRange, frequency: FilingFrequency) -> Self {
        FilingPeriod {
            start: range.start,
            end: range.end,
            frequency,
        }
    }

    /// The calendar-aligned period at `frequency` that contains `date`.
    /// `None` when the period would run past the end of the calendar.
    pub fn containing(date: NaiveDate, frequency: FilingFrequency) -> Option<Self> {
        let start = match frequency {
            FilingFrequency::Monthly => first_of_month(date),
            FilingFrequency::Quarterly => {
                first_of_month(date).checked_sub_months(Months::new(date.month0() % 3))?
            }
            FilingFrequency::Annual => first_of_year(date),
        };
        let end = last_of_month(start.checked_add_months(Months::new(frequency.months() - 1))?)?;
        Some(FilingPeriod {
            start,
            end,
            frequency,
        })
    }

    pub fn next(&self) -> Option<Self> {
        FilingPeriod::containing(self.end.succ_opt()?, self.frequency)
    }

    pub fn previous(&self) -> Option<Self> {
        FilingPeriod::containing(self.start.pred_opt()?, self.frequency)
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.frequency.due_date(self.end)
    }

    /// Human label: "January 2024", "Q1 2024" or "2024". Periods not
    /// aligned to the calendar are labelled by their date range.
    pub fn label(&self) -> String {
        if FilingPeriod::containing(self.start, self.frequency) != Some(*self) {
            return self.range().to_string();
        }
        match self.frequency {
            FilingFrequency::Monthly => self.start.format("%B %Y").to_string(),
            FilingFrequency::Quarterly => {
                format!("Q{} {}", self.start.month0() / 3 + 1, self.start.year())
            }
            FilingFrequency::Annual => self.start.year().to_string(),
        }
    }
}

/// An upcoming filing obligation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub period: String,
    pub due_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub days_until_due: i64,
}

/// Longest look-ahead honoured by [`upcoming_deadlines`], in months
pub const MAX_MONTHS_AHEAD: u32 = 1200;

/// Enumerate deadlines not yet passed, for periods starting before
/// `today + months_ahead`, soonest first.
///
/// The most recently closed period is included while its return is still
/// open. Annual filers get no entries. Look-ahead is capped at
/// [`MAX_MONTHS_AHEAD`] and enumeration stops at the end of the calendar.
pub fn upcoming_deadlines(
    frequency: FilingFrequency,
    today: NaiveDate,
    months_ahead: u32,
    kind: &str,
) -> Vec<Deadline> {
    if frequency == FilingFrequency::Annual {
        log::debug!("Deadline enumeration is not available for annual filers");
        return Vec::new();
    }

    let months_ahead = months_ahead.min(MAX_MONTHS_AHEAD);
    let horizon = today
        .checked_add_months(Months::new(months_ahead))
        .unwrap_or(NaiveDate::MAX);
    let mut deadlines = Vec::new();
    let mut next = FilingPeriod::containing(today, frequency)
        .map(|current| current.previous().unwrap_or(current));

    while let Some(period) = next.filter(|p| p.start < horizon) {
        let Some(due_date) = period.due_date() else {
            break;
        };
        if due_date >= today {
            deadlines.push(Deadline {
                period: period.label(),
                due_date,
                kind: kind.to_string(),
                days_until_due: (due_date - today).num_days(),
            });
        }
        next = period.next();
    }

    deadlines.sort_by_key(|d| d.days_until_due);
    deadlines
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year(), 12, 31)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)?.pred_opt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn monthly_due_on_the_15th_of_next_month() {
        let due = FilingFrequency::Monthly.due_date(date("2024-01-31")).unwrap();
        assert_eq!(due, date("2024-02-15"));
        let due = FilingFrequency::Monthly.due_date(date("2024-12-31")).unwrap();
        assert_eq!(due, date("2025-01-15"));
    }

    #[test]
    fn quarterly_due_at_end_of_next_month() {
        assert_eq!(
            FilingFrequency::Quarterly.due_date(date("2024-03-31")).unwrap(),
            date("2024-04-30")
        );
        assert_eq!(
            FilingFrequency::Quarterly.due_date(date("2023-12-31")).unwrap(),
            date("2024-01-31")
        );
        // Leap year February
        assert_eq!(
            FilingFrequency::Quarterly.due_date(date("2024-01-31")).unwrap(),
            date("2024-02-29")
        );
    }

    #[test]
    fn annual_due_march_31_next_year() {
        assert_eq!(
            FilingFrequency::Annual.due_date(date("2024-12-31")).unwrap(),
            date("2025-03-31")
        );
        assert_eq!(
            FilingFrequency::Annual.due_date(date("2024-06-30")).unwrap(),
            date("2025-03-31")
        );
    }

    #[test]
    fn frequency_from_str() {
        assert_eq!("monthly".parse(), Ok(FilingFrequency::Monthly));
        assert_eq!("Quarterly".parse(), Ok(FilingFrequency::Quarterly));
        assert_eq!("ANNUAL".parse(), Ok(FilingFrequency::Annual));
        assert!("weekly".parse::<FilingFrequency>().is_err());
    }

    #[test]
    fn containing_period_is_calendar_aligned() {
        let q = FilingPeriod::containing(date("2024-05-20"), FilingFrequency::Quarterly).unwrap();
        assert_eq!(q.start, date("2024-04-01"));
        assert_eq!(q.end, date("2024-06-30"));
        assert_eq!(q.label(), "Q2 2024");

        let m = FilingPeriod::containing(date("2024-02-10"), FilingFrequency::Monthly).unwrap();
        assert_eq!(m.start, date("2024-02-01"));
        assert_eq!(m.end, date("2024-02-29"));
        assert_eq!(m.label(), "February 2024");

        let y = FilingPeriod::containing(date("2024-02-10"), FilingFrequency::Annual).unwrap();
        assert_eq!(y.start, date("2024-01-01"));
        assert_eq!(y.end, date("2024-12-31"));
        assert_eq!(y.label(), "2024");
    }

    #[test]
    fn unaligned_period_is_labelled_by_range() {
        let range = DateRange::new(date("2024-01-10"), date("2024-02-09"));
        let period = FilingPeriod::new(range, FilingFrequency::Monthly);
        assert_eq!(period.label(), "2024-01-10 to 2024-02-09");
    }

    #[test]
    fn next_and_previous_cross_year_boundaries() {
        let q4 = FilingPeriod::containing(date("2024-11-01"), FilingFrequency::Quarterly).unwrap();
        assert_eq!(q4.next().unwrap().label(), "Q1 2025");
        assert_eq!(q4.next().and_then(|p| p.previous()), Some(q4));

        let jan = FilingPeriod::containing(date("2025-01-01"), FilingFrequency::Monthly).unwrap();
        assert_eq!(jan.previous().unwrap().label(), "December 2024");
    }

    #[test]
    fn quarterly_deadlines_include_open_previous_quarter() {
        let deadlines =
            upcoming_deadlines(FilingFrequency::Quarterly, date("2026-10-17"), 12, "GST/HST");
        let periods: Vec<_> = deadlines.iter().map(|d| d.period.as_str()).collect();
        assert_eq!(
            periods,
            vec!["Q3 2026", "Q4 2026", "Q1 2027", "Q2 2027", "Q3 2027", "Q4 2027"]
        );

        assert_eq!(deadlines[0].due_date, date("2026-10-31"));
        assert_eq!(deadlines[0].days_until_due, 14);
        assert_eq!(deadlines[1].due_date, date("2027-01-31"));
        assert!(deadlines.iter().all(|d| d.kind == "GST/HST"));
    }

    #[test]
    fn monthly_deadlines_skip_passed_returns() {
        let deadlines =
            upcoming_deadlines(FilingFrequency::Monthly, date("2024-03-20"), 3, "GST/HST");
        let periods: Vec<_> = deadlines.iter().map(|d| d.period.as_str()).collect();
        // February's return was due 2024-03-15
        assert_eq!(periods, vec!["March 2024", "April 2024", "May 2024", "June 2024"]);
        assert_eq!(deadlines[0].due_date, date("2024-04-15"));
        assert_eq!(deadlines[0].days_until_due, 26);
    }

    #[test]
    fn deadline_due_today_is_still_upcoming() {
        let deadlines =
            upcoming_deadlines(FilingFrequency::Monthly, date("2024-03-15"), 1, "GST/HST");
        assert_eq!(deadlines[0].period, "February 2024");
        assert_eq!(deadlines[0].days_until_due, 0);
    }

    #[test]
    fn deadlines_sorted_ascending() {
        let deadlines =
            upcoming_deadlines(FilingFrequency::Monthly, date("2024-01-01"), 12, "GST/HST");
        assert!(deadlines
            .windows(2)
            .all(|w| w[0].days_until_due <= w[1].days_until_due));
    }

    #[test]
    fn annual_filers_get_no_deadlines() {
        assert!(upcoming_deadlines(FilingFrequency::Annual, date("2024-01-01"), 12, "GST/HST")
            .is_empty());
    }

    #[test]
    fn periods_at_the_end_of_the_calendar() {
        let last = FilingPeriod::containing(NaiveDate::MAX, FilingFrequency::Monthly).unwrap();
        assert_eq!(last.end, NaiveDate::MAX);
        assert_eq!(last.next(), None);
        assert_eq!(last.due_date(), None);
        assert_eq!(FilingFrequency::Annual.due_date(NaiveDate::MAX), None);
    }

    #[test]
    fn look_ahead_is_capped() {
        let deadlines =
            upcoming_deadlines(FilingFrequency::Monthly, date("2026-10-17"), u32::MAX, "GST/HST");
        // October 2026 through October 2126
        assert_eq!(deadlines.len(), MAX_MONTHS_AHEAD as usize + 1);
        assert_eq!(deadlines[0].period, "October 2026");
    }

    #[test]
    fn deadlines_stop_at_the_end_of_the_calendar() {
        let today = NaiveDate::MAX - Duration::days(100);
        let deadlines = upcoming_deadlines(FilingFrequency::Quarterly, today, 24, "GST/HST");
        // Q3 is still open; Q4's return would fall due past the last date
        assert_eq!(deadlines.len(), 1);
        assert_eq!(deadlines[0].due_date.month(), 10);
    }
}
