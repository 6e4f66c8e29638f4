//! DNS verification of newly discovered subdomains.
//!
//! Certificate-transparency logs are full of names that were issued a
//! certificate but never given a DNS record (or whose records are long
//! gone). Before notifying, each discovery can optionally be resolved for A
//! and CNAME records; names where neither query produces anything are
//! dropped from the notification, and resolver trouble (timeouts, server
//! failures) is reported as such rather than silently swallowed.

use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

/// Outcome of querying one record type for one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The query answered with these record values.
    Answered(Vec<String>),
    /// The name exists (or doesn't), but has no records of this type.
    NoAnswer,
    /// The resolver gave up waiting.
    TimedOut,
    /// The resolver failed outright (SERVFAIL, network trouble, etc.).
    Failed,
}

impl RecordOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, RecordOutcome::Answered(_))
    }
}

/// A and CNAME outcomes for one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub a: RecordOutcome,
    pub cname: RecordOutcome,
}

impl ResolutionResult {
    /// Whether this result carries anything worth reporting. Records count,
    /// and so do timeouts and failures (the operator should hear about a
    /// name whose resolution broke); only a name with no records of either
    /// type is silent.
    pub fn has_records(&self) -> bool {
        !(self.a == RecordOutcome::NoAnswer && self.cname == RecordOutcome::NoAnswer)
    }
}

/// Internal per-query outcome, before NXDOMAIN is folded into `NoAnswer`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LookupOutcome {
    Records(Vec<String>),
    Empty,
    NxDomain,
    TimedOut,
    Failed,
}

/// Resolves A and CNAME records for `host`.
///
/// NXDOMAIN on the address query short-circuits: the name does not exist,
/// so the alias query is skipped and both outcomes are `NoAnswer`. A timeout
/// or hard failure on the address query also short-circuits, since a name
/// server that could not answer the first query will not answer the second.
pub async fn resolve_host(resolver: &TokioAsyncResolver, host: &str) -> ResolutionResult {
    let a = lookup_records(resolver, host, RecordType::A).await;
    match a {
        LookupOutcome::NxDomain => {
            return ResolutionResult {
                a: RecordOutcome::NoAnswer,
                cname: RecordOutcome::NoAnswer,
            }
        }
        LookupOutcome::TimedOut => {
            return ResolutionResult {
                a: RecordOutcome::TimedOut,
                cname: RecordOutcome::TimedOut,
            }
        }
        LookupOutcome::Failed => {
            return ResolutionResult {
                a: RecordOutcome::Failed,
                cname: RecordOutcome::Failed,
            }
        }
        LookupOutcome::Records(_) | LookupOutcome::Empty => {}
    }

    let cname = lookup_records(resolver, host, RecordType::CNAME).await;
    ResolutionResult {
        a: outcome_from(a),
        cname: outcome_from(cname),
    }
}

async fn lookup_records(
    resolver: &TokioAsyncResolver,
    host: &str,
    record_type: RecordType,
) -> LookupOutcome {
    match resolver.lookup(host, record_type).await {
        Ok(lookup) => {
            let records: Vec<String> = lookup
                .iter()
                .filter_map(|rdata| match rdata {
                    RData::A(ip) if record_type == RecordType::A => Some(ip.to_string()),
                    RData::CNAME(name) if record_type == RecordType::CNAME => {
                        Some(name.to_utf8())
                    }
                    _ => None,
                })
                .collect();
            if records.is_empty() {
                LookupOutcome::Empty
            } else {
                LookupOutcome::Records(records)
            }
        }
        Err(e) => classify_failure(e.kind()),
    }
}

fn classify_failure(kind: &ResolveErrorKind) -> LookupOutcome {
    match kind {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                LookupOutcome::NxDomain
            } else {
                LookupOutcome::Empty
            }
        }
        ResolveErrorKind::Timeout => LookupOutcome::TimedOut,
        // Some transports report timeouts through proto errors; catch those
        // by message before declaring a hard failure
        other => {
            if other.to_string().contains("timed out") {
                LookupOutcome::TimedOut
            } else {
                LookupOutcome::Failed
            }
        }
    }
}

fn outcome_from(lookup: LookupOutcome) -> RecordOutcome {
    match lookup {
        LookupOutcome::Records(records) => RecordOutcome::Answered(records),
        LookupOutcome::Empty | LookupOutcome::NxDomain => RecordOutcome::NoAnswer,
        LookupOutcome::TimedOut => RecordOutcome::TimedOut,
        LookupOutcome::Failed => RecordOutcome::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_timeout() {
        assert_eq!(
            classify_failure(&ResolveErrorKind::Timeout),
            LookupOutcome::TimedOut
        );
    }

    #[test]
    fn test_classify_timeout_by_message() {
        let kind = ResolveErrorKind::Msg("request timed out".to_string());
        assert_eq!(classify_failure(&kind), LookupOutcome::TimedOut);
    }

    #[test]
    fn test_classify_other_failures() {
        let kind = ResolveErrorKind::Message("connection refused");
        assert_eq!(classify_failure(&kind), LookupOutcome::Failed);
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(
            outcome_from(LookupOutcome::Records(vec!["93.184.216.34".to_string()])),
            RecordOutcome::Answered(vec!["93.184.216.34".to_string()])
        );
        assert_eq!(outcome_from(LookupOutcome::Empty), RecordOutcome::NoAnswer);
        assert_eq!(
            outcome_from(LookupOutcome::NxDomain),
            RecordOutcome::NoAnswer
        );
        assert_eq!(
            outcome_from(LookupOutcome::TimedOut),
            RecordOutcome::TimedOut
        );
        assert_eq!(outcome_from(LookupOutcome::Failed), RecordOutcome::Failed);
    }

    #[test]
    fn test_has_records() {
        let answered = ResolutionResult {
            a: RecordOutcome::Answered(vec!["93.184.216.34".to_string()]),
            cname: RecordOutcome::NoAnswer,
        };
        assert!(answered.has_records());

        // A timeout is reportable: the operator should hear about it
        let timed_out = ResolutionResult {
            a: RecordOutcome::TimedOut,
            cname: RecordOutcome::TimedOut,
        };
        assert!(timed_out.has_records());

        let silent = ResolutionResult {
            a: RecordOutcome::NoAnswer,
            cname: RecordOutcome::NoAnswer,
        };
        assert!(!silent.has_records());
    }
}
