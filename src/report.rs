//! Per-agent aggregation of classified unlock and reset records.
//!
//! The unlock summary counts successful unlocks, unauthorized unlocks and
//! resets of subscribers that were not also unlocked. The agent summary
//! pivots successful resets by module.

use crate::classify::{ClassifiedReset, ClassifiedUnlock, Outcome, Rules};
use crate::error::Result;
use crate::record::{ResetRecord, UnlockRecord};
use crate::table::RawTable;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

pub const APPROVE_RESET_PIN: &str = "APPROVE RESET PIN";
pub const REJECT_RESET_PIN: &str = "REJECT RESET PIN";
pub const LOCK_ACCOUNT: &str = "LOCK ACCOUNT";

/// A row type that can be shown as a table
pub trait SummaryRow: Serialize {
    /// Column headers, in cell order
    const COLUMNS: &'static [&'static str];

    /// Cell values, in [`SummaryRow::COLUMNS`] order
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockSummaryRow {
    #[serde(rename = "USERNAME")]
    pub username: String,
    #[serde(rename = "UNLOCK")]
    pub unlock: u64,
    #[serde(rename = "RESET_ONLY")]
    pub reset_only: u64,
    #[serde(rename = "UNAUTH")]
    pub unauth: u64,
    #[serde(rename = "TOTAL")]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummaryRow {
    #[serde(rename = "USERNAME")]
    pub username: String,
    #[serde(rename = "APPROVE RESET PIN")]
    pub approve_reset_pin: u64,
    #[serde(rename = "REJECT RESET PIN")]
    pub reject_reset_pin: u64,
    #[serde(rename = "LOCK ACCOUNT")]
    pub lock_account: u64,
}

impl SummaryRow for UnlockSummaryRow {
    const COLUMNS: &'static [&'static str] = &["USERNAME", "UNLOCK", "RESET_ONLY", "UNAUTH", "TOTAL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.unlock.to_string(),
            self.reset_only.to_string(),
            self.unauth.to_string(),
            self.total.to_string(),
        ]
    }
}

impl SummaryRow for AgentSummaryRow {
    const COLUMNS: &'static [&'static str] =
        &["USERNAME", APPROVE_RESET_PIN, REJECT_RESET_PIN, LOCK_ACCOUNT];

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.approve_reset_pin.to_string(),
            self.reject_reset_pin.to_string(),
            self.lock_account.to_string(),
        ]
    }
}

/// Grand totals shown next to the unlock summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockTotals {
    pub unlock: u64,
    pub reset_only: u64,
    pub unauth: u64,
    pub total: u64,
}

/// Grand totals shown next to the agent summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentTotals {
    pub approved: u64,
    pub rejected: u64,
    pub lock_account: u64,
}

impl AgentTotals {
    /// Approved plus rejected requests
    pub fn processed(&self) -> u64 {
        self.approved + self.rejected
    }
}

/// What happened to the input rows on the way to the summaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub out_of_scope_unlocks: usize,
    pub out_of_scope_resets: usize,
    pub failed_unlocks: usize,
    pub failed_resets: usize,
    /// Successful resets dropped because the subscriber was also unlocked
    pub deduplicated_resets: usize,
    /// In-scope records whose log has no subscriber number
    pub missing_subscriber: usize,
    /// In-scope records whose log has several subscriber numbers
    pub ambiguous_subscriber: usize,
    /// Lock reasons absent from the reason table that ended up unauthorized
    pub unmapped_reasons: BTreeMap<String, usize>,
    /// Lock reasons absent from the reason table that an exception actor
    /// turned into successful unlocks
    pub overridden_reasons: BTreeMap<String, usize>,
    /// Records with no usable timestamp
    pub undated_records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub unlock_summary: Vec<UnlockSummaryRow>,
    pub agent_summary: Vec<AgentSummaryRow>,
    pub diagnostics: Diagnostics,
}

impl Report {
    pub fn unlock_totals(&self) -> UnlockTotals {
        self.unlock_summary
            .iter()
            .fold(UnlockTotals::default(), |acc, row| UnlockTotals {
                unlock: acc.unlock + row.unlock,
                reset_only: acc.reset_only + row.reset_only,
                unauth: acc.unauth + row.unauth,
                total: acc.total + row.total,
            })
    }

    pub fn agent_totals(&self) -> AgentTotals {
        self.agent_summary
            .iter()
            .fold(AgentTotals::default(), |acc, row| AgentTotals {
                approved: acc.approved + row.approve_reset_pin,
                rejected: acc.rejected + row.reject_reset_pin,
                lock_account: acc.lock_account + row.lock_account,
            })
    }
}

#[derive(Default)]
struct UnlockCounts {
    unlock: u64,
    reset_only: u64,
    unauth: u64,
}

/// Build both summaries from raw tables, checking their schema
pub fn build_report(unlock: &RawTable, reset: &RawTable, rules: &Rules) -> Result<Report> {
    let unlock_records = UnlockRecord::from_table(unlock)?;
    let reset_records = ResetRecord::from_table(reset)?;
    Ok(build_report_from_records(&unlock_records, &reset_records, rules))
}

/// Build both summaries from already parsed (and usually date-filtered) records
pub fn build_report_from_records(
    unlock_records: &[UnlockRecord],
    reset_records: &[ResetRecord],
    rules: &Rules,
) -> Report {
    let mut diagnostics = Diagnostics::default();

    let unlocks: Vec<ClassifiedUnlock> = unlock_records
        .iter()
        .filter(|record| rules.in_scope(&record.username))
        .map(|record| rules.classify_unlock(record))
        .collect();
    let resets: Vec<ClassifiedReset> = reset_records
        .iter()
        .filter(|record| rules.in_scope(&record.username))
        .map(|record| rules.classify_reset(record))
        .collect();

    diagnostics.out_of_scope_unlocks = unlock_records.len() - unlocks.len();
    diagnostics.out_of_scope_resets = reset_records.len() - resets.len();
    diagnostics.missing_subscriber = unlocks
        .iter()
        .map(|u| &u.subscriber_id)
        .chain(resets.iter().map(|r| &r.subscriber_id))
        .filter(|id| id.is_none())
        .count();
    diagnostics.ambiguous_subscriber = unlocks.iter().filter(|u| u.ambiguous_subscriber).count()
        + resets.iter().filter(|r| r.ambiguous_subscriber).count();

    diagnostics.undated_records = unlock_records
        .iter()
        .filter(|r| r.timestamp.is_none())
        .count()
        + reset_records.iter().filter(|r| r.timestamp.is_none()).count();

    for unlock in unlocks.iter().filter(|u| !rules.is_known_reason(&u.lock_reason)) {
        let tally = match unlock.outcome {
            Outcome::Unauthorized => &mut diagnostics.unmapped_reasons,
            Outcome::Success => &mut diagnostics.overridden_reasons,
            Outcome::Failure => continue,
        };
        *tally.entry(unlock.lock_reason.clone()).or_insert(0) += 1;
    }
    diagnostics.failed_unlocks = unlocks
        .iter()
        .filter(|u| u.outcome == Outcome::Failure)
        .count();

    let successful_resets: Vec<&ClassifiedReset> = resets
        .iter()
        .filter(|r| r.outcome == Outcome::Success)
        .collect();
    diagnostics.failed_resets = resets.len() - successful_resets.len();

    debug!(
        unlocks = unlocks.len(),
        resets = resets.len(),
        successful_resets = successful_resets.len(),
        "classified in-scope records"
    );

    let unlocked_subscribers: HashSet<&str> = unlocks
        .iter()
        .filter(|u| u.outcome == Outcome::Success)
        .filter_map(|u| u.subscriber_id.as_deref())
        .collect();

    let mut counts: BTreeMap<&str, UnlockCounts> = BTreeMap::new();
    for unlock in &unlocks {
        match unlock.outcome {
            Outcome::Success => counts.entry(&unlock.username).or_default().unlock += 1,
            Outcome::Unauthorized => counts.entry(&unlock.username).or_default().unauth += 1,
            Outcome::Failure => {}
        }
    }
    for reset in &successful_resets {
        let already_unlocked = reset
            .subscriber_id
            .as_deref()
            .is_some_and(|id| unlocked_subscribers.contains(id));
        if already_unlocked {
            diagnostics.deduplicated_resets += 1;
        } else {
            counts.entry(&reset.username).or_default().reset_only += 1;
        }
    }

    let mut unlock_summary: Vec<UnlockSummaryRow> = counts
        .into_iter()
        .map(|(username, c)| UnlockSummaryRow {
            username: username.to_string(),
            unlock: c.unlock,
            reset_only: c.reset_only,
            unauth: c.unauth,
            total: c.unlock + c.reset_only,
        })
        .collect();
    unlock_summary.sort_by(|a, b| b.total.cmp(&a.total));

    let agent_summary = pivot_agents(&successful_resets, rules.excluded_module());

    if !diagnostics.unmapped_reasons.is_empty() {
        warn!(
            reasons = diagnostics.unmapped_reasons.len(),
            records = diagnostics.unmapped_reasons.values().sum::<usize>(),
            "unlock reasons outside the reason table were counted as unauthorized"
        );
    }
    if !diagnostics.overridden_reasons.is_empty() {
        debug!(
            reasons = diagnostics.overridden_reasons.len(),
            records = diagnostics.overridden_reasons.values().sum::<usize>(),
            "unmapped unlock reasons of exception actors were counted as successful"
        );
    }

    Report {
        unlock_summary,
        agent_summary,
        diagnostics,
    }
}

/// Username x module counts, projected onto the fixed agent columns
fn pivot_agents(resets: &[&ClassifiedReset], excluded_module: &str) -> Vec<AgentSummaryRow> {
    let mut pivot: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
    for reset in resets.iter().filter(|r| r.module != excluded_module) {
        *pivot
            .entry(&reset.username)
            .or_default()
            .entry(&reset.module)
            .or_insert(0) += 1;
    }

    let mut rows: Vec<AgentSummaryRow> = pivot
        .into_iter()
        .map(|(username, modules)| {
            let count = |module: &str| modules.get(module).copied().unwrap_or(0);
            AgentSummaryRow {
                username: username.to_string(),
                approve_reset_pin: count(APPROVE_RESET_PIN),
                reject_reset_pin: count(REJECT_RESET_PIN),
                lock_account: count(LOCK_ACCOUNT),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.approve_reset_pin.cmp(&a.approve_reset_pin));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn rules() -> Rules {
        Rules::from_config(&ReportConfig::default()).unwrap()
    }

    fn unlock(username: &str, log: &str) -> UnlockRecord {
        UnlockRecord::new(ts(), username, log)
    }

    fn reset(username: &str, log: &str, module: &str) -> ResetRecord {
        ResetRecord::new(ts(), username, log, module)
    }

    #[test]
    fn test_unlock_summary_counts_and_total() {
        let unlocks = vec![
            unlock("WEBC_JOHN", "Unlock 2291111111111: INVALID PASSWORD"),
            unlock("WEBC_JOHN", "Unlock 2291111111112: FAILED TRANSACTION"),
            unlock("WEBC_JOHN", "Unlock 2291111111113: SOME OTHER REASON"),
            unlock("WEBC_JOHN", "Unlock 2291111111114: "),
        ];
        let resets = vec![reset(
            "WEBC_JOHN",
            "Reset successfully for 2292222222222",
            APPROVE_RESET_PIN,
        )];

        let report = build_report_from_records(&unlocks, &resets, &rules());
        assert_eq!(
            report.unlock_summary,
            vec![UnlockSummaryRow {
                username: "WEBC_JOHN".to_string(),
                unlock: 2,
                reset_only: 1,
                unauth: 1,
                total: 3,
            }]
        );
        assert_eq!(report.diagnostics.failed_unlocks, 1);
        assert_eq!(report.diagnostics.unmapped_reasons.get("SOME OTHER REASON"), Some(&1));
    }

    #[test]
    fn test_reset_of_unlocked_subscriber_is_not_reset_only() {
        let unlocks = vec![unlock("WEBC_JOHN", "Unlock 2291234567890: INVALID PASSWORD")];
        let resets = vec![
            reset("WEBC_JANE", "Reset successfully for 2291234567890", APPROVE_RESET_PIN),
            reset("WEBC_JANE", "Reset successfully for 2290000000001", APPROVE_RESET_PIN),
        ];

        let report = build_report_from_records(&unlocks, &resets, &rules());
        let jane = report
            .unlock_summary
            .iter()
            .find(|row| row.username == "WEBC_JANE")
            .unwrap();
        assert_eq!(jane.reset_only, 1);
        assert_eq!(report.diagnostics.deduplicated_resets, 1);
        // The deduplicated reset still counts in the agent pivot
        assert_eq!(report.agent_summary[0].approve_reset_pin, 2);
    }

    #[test]
    fn test_unauthorized_unlock_does_not_dedup_resets() {
        let unlocks = vec![unlock("WEBC_JOHN", "Unlock 2291234567890: ODD")];
        let resets = vec![reset(
            "WEBC_JOHN",
            "Reset successfully for 2291234567890",
            APPROVE_RESET_PIN,
        )];

        let report = build_report_from_records(&unlocks, &resets, &rules());
        assert_eq!(report.unlock_summary[0].reset_only, 1);
        assert_eq!(report.unlock_summary[0].unauth, 1);
        assert_eq!(report.unlock_summary[0].total, 1);
    }

    #[test]
    fn test_resets_without_subscriber_are_never_deduplicated() {
        let unlocks = vec![unlock("WEBC_JOHN", "Unlock without number: INVALID PASSWORD")];
        let resets = vec![reset("WEBC_JOHN", "Reset successfully", LOCK_ACCOUNT)];

        let report = build_report_from_records(&unlocks, &resets, &rules());
        assert_eq!(report.unlock_summary[0].reset_only, 1);
        assert_eq!(report.diagnostics.missing_subscriber, 2);
    }

    #[test]
    fn test_agent_pivot_drops_excluded_and_unknown_modules() {
        let resets = vec![
            reset("WEBC_JANE", "Reset successfully for 2290000000001", APPROVE_RESET_PIN),
            reset("WEBC_JANE", "Reset successfully for 2290000000002", REJECT_RESET_PIN),
            reset("WEBC_JANE", "Reset successfully for 2290000000003", "RESET MOBILE PASSWORD"),
            reset("WEBC_JANE", "Reset failed for 2290000000004", APPROVE_RESET_PIN),
            reset("WEBC_OTTO", "Reset successfully for 2290000000005", "UNLINK DEVICE"),
            reset("WEBC_ANNA", "Reset successfully for 2290000000006", APPROVE_RESET_PIN),
            reset("WEBC_ANNA", "Reset successfully for 2290000000007", APPROVE_RESET_PIN),
        ];

        let report = build_report_from_records(&[], &resets, &rules());
        assert_eq!(
            report.agent_summary,
            vec![
                AgentSummaryRow {
                    username: "WEBC_ANNA".to_string(),
                    approve_reset_pin: 2,
                    reject_reset_pin: 0,
                    lock_account: 0,
                },
                AgentSummaryRow {
                    username: "WEBC_JANE".to_string(),
                    approve_reset_pin: 1,
                    reject_reset_pin: 1,
                    lock_account: 0,
                },
                AgentSummaryRow {
                    username: "WEBC_OTTO".to_string(),
                    approve_reset_pin: 0,
                    reject_reset_pin: 0,
                    lock_account: 0,
                },
            ]
        );
        assert_eq!(report.diagnostics.failed_resets, 1);
        assert_eq!(report.agent_totals().processed(), 4);
    }

    #[test]
    fn test_unlock_summary_sorted_by_total() {
        let unlocks = vec![
            unlock("WEBC_A", "Unlock 2291000000001: INVALID PASSWORD"),
            unlock("WEBC_B", "Unlock 2291000000002: INVALID PASSWORD"),
            unlock("WEBC_B", "Unlock 2291000000003: INVALID PASSWORD"),
            unlock("WEBC_C", "Unlock 2291000000004: ODD"),
        ];

        let report = build_report_from_records(&unlocks, &[], &rules());
        let totals: Vec<(&str, u64)> = report
            .unlock_summary
            .iter()
            .map(|row| (row.username.as_str(), row.total))
            .collect();
        assert_eq!(totals, vec![("WEBC_B", 2), ("WEBC_A", 1), ("WEBC_C", 0)]);
    }

    #[test]
    fn test_totals() {
        let unlocks = vec![
            unlock("WEBC_A", "Unlock 2291000000001: INVALID PASSWORD"),
            unlock("WEBC_B", "Unlock 2291000000002: ODD"),
        ];
        let resets = vec![reset("WEBC_B", "Reset successfully 2291000000009", LOCK_ACCOUNT)];

        let totals = build_report_from_records(&unlocks, &resets, &rules()).unlock_totals();
        assert_eq!(
            totals,
            UnlockTotals {
                unlock: 1,
                reset_only: 1,
                unauth: 1,
                total: 2,
            }
        );
    }

    #[test]
    fn test_exception_actor_reasons_are_not_reported_as_unauthorized() {
        let unlocks = vec![
            unlock("CC_DOPEME_WEBC_EANNE", "Unlock 2291000000001: ODD"),
            unlock("WEBC_JOHN", "Unlock 2291000000002: ODD"),
        ];

        let report = build_report_from_records(&unlocks, &[], &rules());
        let eanne = report
            .unlock_summary
            .iter()
            .find(|row| row.username == "CC_DOPEME_WEBC_EANNE")
            .unwrap();
        assert_eq!((eanne.unlock, eanne.unauth), (1, 0));
        assert_eq!(report.diagnostics.unmapped_reasons.get("ODD"), Some(&1));
        assert_eq!(report.diagnostics.overridden_reasons.get("ODD"), Some(&1));

        let only_eanne = build_report_from_records(&unlocks[..1], &[], &rules());
        assert!(only_eanne.diagnostics.unmapped_reasons.is_empty());
        assert_eq!(only_eanne.unlock_totals().unauth, 0);
    }

    #[test]
    fn test_undated_rows_do_not_fail_the_report() {
        let unlock = RawTable::new(["Timestamp", "Username", "Log"])
            .with_row([
                "2024-05-02 09:00:00",
                "WEBC_JOHN",
                "Unlock 2291000000001: INVALID PASSWORD",
            ])
            .with_row(["", "AGENT_BOB", "Unlock 2291000000002: INVALID PASSWORD"])
            .with_row(["n/a", "WEBC_JOHN", "Unlock 2291000000003: INVALID PASSWORD"]);
        let reset = RawTable::new(["Timestamp", "Username", "Log", "Module"]);

        let report = build_report(&unlock, &reset, &rules()).unwrap();
        assert_eq!(report.unlock_summary.len(), 1);
        assert_eq!(report.unlock_summary[0].username, "WEBC_JOHN");
        assert_eq!(report.unlock_summary[0].unlock, 2);
        assert_eq!(report.diagnostics.undated_records, 2);
        assert_eq!(report.diagnostics.out_of_scope_unlocks, 1);
    }

    #[test]
    fn test_build_report_checks_schema() {
        let unlock = RawTable::new(["Timestamp", "Username", "Log"]);
        let reset = RawTable::new(["Timestamp", "Username", "Module"]);
        let err = build_report(&unlock, &reset, &rules()).unwrap_err();
        assert!(err.is_template_mismatch());
    }
}
