//! Ranked report and manifest generation.
//!
//! The ranked report is plain text, one `candidate:\ttotal` line per
//! candidate. The manifest is the JSON audit trail of every ballot in the
//! order it was cast.

use crate::models::{Ballot, TallySummary};
use crate::tally::Standing;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Render one report line.
pub fn format_standing(standing: &Standing) -> String {
    format!("{}:\t{}", standing.candidate, standing.total)
}

/// Render the full ranked report, one line per candidate.
pub fn generate_ranked_report(standings: &[Standing]) -> String {
    let mut output = String::new();

    for standing in standings {
        output.push_str(&format_standing(standing));
        output.push('\n');
    }

    output
}

/// Write the ranked report to `out`.
pub fn write_ranked_report<W: Write>(standings: &[Standing], out: &mut W) -> Result<()> {
    out.write_all(generate_ranked_report(standings).as_bytes())
        .context("Failed to print ranked report")?;
    out.flush().context("Failed to flush ranked report")?;
    Ok(())
}

/// Write the ranked report to `out`, then the manifest to `path`.
///
/// A failure on `out` is logged and does not stop the manifest write.
pub fn publish<W: Write>(
    standings: &[Standing],
    manifest: &[Ballot],
    path: &Path,
    out: &mut W,
) -> Result<()> {
    if let Err(e) = write_ranked_report(standings, out) {
        warn!("{:#}", e);
    }

    write_manifest(manifest, path)
}

/// Serialize the manifest as indented JSON.
pub fn generate_manifest_json(manifest: &[Ballot]) -> Result<String> {
    serde_json::to_string_pretty(manifest).map_err(Into::into)
}

/// Write the manifest to `path`, replacing any existing file.
pub fn write_manifest(manifest: &[Ballot], path: &Path) -> Result<()> {
    let content = generate_manifest_json(manifest)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create manifest {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write manifest {}", path.display()))?;

    Ok(())
}

/// Generate a one-paragraph text summary of a run.
pub fn generate_summary_text(summary: &TallySummary, candidates: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} comments read, {} counted, {} skipped",
        summary.records_seen,
        summary.counted,
        summary.skipped()
    ));

    if summary.skipped() > 0 {
        lines.push(format!(
            "skipped: {} anonymous, {} repeat voters, {} nested replies",
            summary.skipped_anonymous, summary.skipped_repeat, summary.skipped_nested
        ));
    }

    if summary.empty_ballots > 0 {
        lines.push(format!(
            "{} counted comments named no valid candidate",
            summary.empty_ballots
        ));
    }

    lines.push(format!(
        "{} ballots across {} candidates",
        summary.ballots, candidates
    ));

    lines.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings() -> Vec<Standing> {
        vec![
            Standing {
                candidate: 1,
                total: 10,
            },
            Standing {
                candidate: 2,
                total: 10,
            },
            Standing {
                candidate: 3,
                total: -2,
            },
        ]
    }

    #[test]
    fn test_format_standing() {
        let line = format_standing(&Standing {
            candidate: 7,
            total: 3,
        });
        assert_eq!(line, "7:\t3");
    }

    #[test]
    fn test_generate_ranked_report() {
        let report = generate_ranked_report(&standings());
        assert_eq!(report, "1:\t10\n2:\t10\n3:\t-2\n");
        assert!(generate_ranked_report(&[]).is_empty());
    }

    #[test]
    fn test_generate_manifest_json() {
        let manifest = vec![Ballot {
            author: "A".to_string(),
            body: "I vote 1".to_string(),
            candidate: 1,
            score: 10,
        }];

        let json = generate_manifest_json(&manifest).unwrap();
        let expected = "[\n  {\n    \"author\": \"A\",\n    \"body\": \"I vote 1\",\n    \"candidate\": 1,\n    \"score\": 10\n  }\n]";
        assert_eq!(json, expected);

        assert_eq!(generate_manifest_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let manifest = vec![
            Ballot {
                author: "A".to_string(),
                body: "1 2".to_string(),
                candidate: 2,
                score: 4,
            },
            Ballot {
                author: "A".to_string(),
                body: "1 2".to_string(),
                candidate: 1,
                score: 4,
            },
        ];

        write_manifest(&manifest, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Ballot> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_write_manifest_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("votes.json");

        let err = write_manifest(&[], &path).unwrap_err();
        assert!(err.to_string().contains("Failed to create manifest"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_write_ranked_report() {
        let mut out = Vec::new();
        write_ranked_report(&standings(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1:\t10\n2:\t10\n3:\t-2\n");

        let err = write_ranked_report(&standings(), &mut ClosedPipe).unwrap_err();
        assert!(err.to_string().contains("Failed to print ranked report"));
    }

    #[test]
    fn test_publish_writes_manifest_when_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let manifest = vec![Ballot {
            author: "A".to_string(),
            body: "1".to_string(),
            candidate: 1,
            score: 10,
        }];

        publish(&standings(), &manifest, &path, &mut ClosedPipe).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Ballot> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_publish_reports_manifest_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("votes.json");
        let mut out = Vec::new();

        assert!(publish(&standings(), &[], &path, &mut out).is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "1:\t10\n2:\t10\n3:\t-2\n");
    }

    #[test]
    fn test_generate_summary_text() {
        let summary = TallySummary {
            records_seen: 6,
            counted: 4,
            empty_ballots: 1,
            skipped_anonymous: 1,
            skipped_repeat: 1,
            skipped_nested: 0,
            ballots: 4,
        };

        let text = generate_summary_text(&summary, 3);
        assert!(text.contains("6 comments read, 4 counted, 2 skipped"));
        assert!(text.contains("1 anonymous, 1 repeat voters"));
        assert!(text.contains("1 counted comments named no valid candidate"));
        assert!(text.contains("4 ballots across 3 candidates"));
    }
}
