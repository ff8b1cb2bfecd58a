//! `scoutflow ingest`: process a batch of scanned codes and upload the new ones.
//!
//! The batch is prepared first (history read, classification, deduplication,
//! ids), reported, and only then committed. Declining the prompt or passing
//! `--dry-run` drops the prepared batch, so nothing is written.

use crate::cli::config::ResolvedConfig;
use crate::cli::error::HelpfulError;
use crate::cli::output::{plural, print_table, truncate};
use crate::cli::{load_schema_file, runtime};
use anyhow::{Context, Result};
use scoutflow_ingest::{IngestError, IngestResult, Ingestor, PreparedBatch};
use scoutflow_store::{DocumentStore, MemoryStore, SqliteStore};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug)]
pub struct IngestArgs {
    pub codes: Vec<String>,
    pub file: Option<PathBuf>,
    pub yes: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Codes read for one run, plus input lines that could not be read as text.
#[derive(Debug, Default, PartialEq, Eq)]
struct CodeInput {
    codes: Vec<String>,
    /// 1-based line numbers that were not valid UTF-8.
    unreadable_lines: Vec<usize>,
}

/// What happened to the prepared batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Outcome {
    Uploaded,
    NothingToUpload,
    DryRun,
    Declined,
}

#[derive(Debug, Serialize)]
struct IngestReport<'a> {
    status: Outcome,
    collection: &'a str,
    summary: scoutflow_ingest::IngestSummary,
    accepted: &'a [scoutflow_ingest::AcceptedRecord],
    rejected_unrecognized: Vec<&'a str>,
    rejected_duplicate: Vec<&'a str>,
    unreadable_lines: &'a [usize],
}

impl<'a> IngestReport<'a> {
    fn new(
        status: Outcome,
        collection: &'a str,
        result: &'a IngestResult,
        unreadable_lines: &'a [usize],
    ) -> Self {
        Self {
            status,
            collection,
            summary: result.summary(),
            accepted: &result.accepted,
            rejected_unrecognized: result
                .rejected_unrecognized
                .iter()
                .map(|r| r.raw.as_str())
                .collect(),
            rejected_duplicate: result
                .rejected_duplicate
                .iter()
                .map(|r| r.raw.as_str())
                .collect(),
            unreadable_lines,
        }
    }
}

pub fn run(args: IngestArgs, config: &ResolvedConfig) -> Result<()> {
    let input = collect_codes(&args)?;
    let schema = load_schema_file(&config.schema_path)?;
    info!(
        codes = input.codes.len(),
        unreadable = input.unreadable_lines.len(),
        collection = %config.collection,
        dry_run = args.dry_run,
        "Starting ingest"
    );

    let rt = runtime()?;
    rt.block_on(async {
        // A dry run against a database that does not exist yet has no history.
        if args.dry_run && !config.db_path.exists() {
            let ingestor = Ingestor::new(MemoryStore::new(), schema, config.ingest_config());
            return execute(ingestor, input, &args).await;
        }

        let store = SqliteStore::open(&config.db_path)
            .await
            .map_err(|err| HelpfulError::store_unavailable(&config.db_path, err))?;
        let ingestor = Ingestor::new(store.clone(), schema, config.ingest_config());
        let outcome = execute(ingestor, input, &args).await;
        store.close().await;
        outcome
    })
}

async fn execute<S: DocumentStore>(
    mut ingestor: Ingestor<S>,
    input: CodeInput,
    args: &IngestArgs,
) -> Result<()> {
    let batch = ingestor.prepare(input.codes).await?;

    if !args.json {
        print_batch(&batch, &input.unreadable_lines);
    }

    let status = if args.dry_run {
        Outcome::DryRun
    } else if batch.result().accepted.is_empty() {
        Outcome::NothingToUpload
    } else if args.yes || confirm(&batch)? {
        Outcome::Uploaded
    } else {
        Outcome::Declined
    };

    let result = match status {
        Outcome::Uploaded | Outcome::NothingToUpload => ingestor
            .commit(batch)
            .await
            .map_err(persistence_help)?,
        Outcome::DryRun | Outcome::Declined => batch.into_result(),
    };

    let collection = ingestor.config().collection.as_str();
    if args.json {
        let report = IngestReport::new(status, collection, &result, &input.unreadable_lines);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match status {
            Outcome::Uploaded => println!(
                "Uploaded {} to '{}'.",
                plural(result.accepted.len(), "code"),
                collection
            ),
            Outcome::NothingToUpload => println!("No new codes to upload."),
            Outcome::DryRun => println!("Dry run: nothing was uploaded."),
            Outcome::Declined => println!("Aborted: nothing was uploaded."),
        }
    }
    Ok(())
}

fn persistence_help(err: IngestError) -> anyhow::Error {
    if err.is_duplicate_conflict() {
        HelpfulError::new("Upload rejected: some codes were stored by another run")
            .with_context(format!("{}. Nothing from this batch was stored.", err))
            .with_suggestion("TRY: Run the same ingest again; the codes stored meanwhile will be reported as duplicates")
            .into()
    } else {
        err.into()
    }
}

fn print_batch(batch: &PreparedBatch, unreadable_lines: &[usize]) {
    let result = batch.result();
    let summary = result.summary();

    println!("Processed {}:", plural(summary.total(), "code"));
    println!("  accepted:      {}", summary.accepted);
    println!("  unrecognized:  {}", summary.rejected_unrecognized);
    println!("  duplicates:    {}", summary.rejected_duplicate);

    if !result.rejected_unrecognized.is_empty() {
        println!();
        println!("Unrecognized codes (no record kind matches the first character):");
        for rejection in &result.rejected_unrecognized {
            println!("  {}", rejection.raw);
        }
    }

    if !unreadable_lines.is_empty() {
        println!();
        let numbers: Vec<String> = unreadable_lines.iter().map(|n| n.to_string()).collect();
        println!(
            "Skipped {} that are not valid UTF-8: {}",
            plural(unreadable_lines.len(), "input line"),
            numbers.join(", ")
        );
    }

    if !result.rejected_duplicate.is_empty() {
        println!();
        println!("{} not uploaded:", plural(result.rejected_duplicate.len(), "duplicate code"));
        for rejection in &result.rejected_duplicate {
            println!("  {}", rejection.raw);
        }
    }

    if !result.accepted.is_empty() {
        println!();
        let rows = result
            .accepted
            .iter()
            .map(|record| {
                vec![
                    record.kind.clone(),
                    record.id.to_string(),
                    record.readable_time.clone(),
                    truncate(&record.raw, 48),
                ]
            })
            .collect();
        print_table(&["KIND", "ID", "TIME", "CODE"], rows);
    }
}

fn confirm(batch: &PreparedBatch) -> Result<bool> {
    eprint!(
        "Upload {} to '{}'? [y/N] ",
        plural(batch.result().accepted.len(), "code"),
        batch.collection()
    );
    io::stderr().flush()?;

    let mut answer = String::new();
    let read = io::stdin().lock().read_line(&mut answer)?;
    if read == 0 {
        eprintln!();
        eprintln!("No answer received; pass --yes to upload without a prompt.");
        return Ok(false);
    }
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn collect_codes(args: &IngestArgs) -> Result<CodeInput> {
    if !args.codes.is_empty() {
        return Ok(CodeInput {
            codes: args.codes.clone(),
            unreadable_lines: Vec::new(),
        });
    }

    match &args.file {
        Some(path) => {
            if !path.exists() {
                return Err(HelpfulError::file_not_found(path).into());
            }
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open codes file: {}", path.display()))?;
            read_codes(io::BufReader::new(file))
                .with_context(|| format!("Failed to read codes file: {}", path.display()))
        }
        None => read_codes(io::stdin().lock()).context("Failed to read codes from stdin"),
    }
}

/// One code per line. `\n` / `\r\n` terminators are stripped and empty lines
/// skipped; every other line is kept byte-for-byte, whitespace included. A
/// line that is not valid UTF-8 is skipped and reported by number.
fn read_codes<R: BufRead>(mut reader: R) -> io::Result<CodeInput> {
    let mut input = CodeInput::default();
    let mut line = Vec::new();
    let mut number = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        number += 1;
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        if line.is_empty() {
            continue;
        }
        match std::str::from_utf8(&line) {
            Ok(code) => input.codes.push(code.to_string()),
            Err(_) => {
                warn!(line = number, "Skipping input line that is not valid UTF-8");
                input.unreadable_lines.push(number);
            }
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoutflow_store::StoreError;
    use std::io::Cursor;

    #[test]
    fn test_read_codes_keeps_whitespace() {
        let input = "*a;b\r\n\n  \n*a;b \n#1,2";
        let read = read_codes(Cursor::new(input)).unwrap();
        assert_eq!(read.codes, vec!["*a;b", "  ", "*a;b ", "#1,2"]);
        assert!(read.unreadable_lines.is_empty());
    }

    #[test]
    fn test_read_codes_skips_only_invalid_utf8_lines() {
        let input: &[u8] = b"*a;b\n\xff\xfe;x\r\n#1,2\n*\xc3(\n+ok";
        let read = read_codes(Cursor::new(input)).unwrap();
        assert_eq!(read.codes, vec!["*a;b", "#1,2", "+ok"]);
        assert_eq!(read.unreadable_lines, vec![2, 4]);
    }

    #[test]
    fn test_read_codes_empty_input() {
        assert_eq!(read_codes(Cursor::new("")).unwrap(), CodeInput::default());
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("YES"));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_args_take_precedence_over_file() {
        let args = IngestArgs {
            codes: vec!["*x".to_string()],
            file: Some(PathBuf::from("/does/not/exist")),
            yes: true,
            dry_run: false,
            json: false,
        };
        assert_eq!(collect_codes(&args).unwrap().codes, vec!["*x"]);
    }

    fn persistence_failure(source: StoreError) -> IngestError {
        IngestError::Persistence {
            collection: "raw_codes".to_string(),
            count: 1,
            source,
        }
    }

    #[test]
    fn test_only_duplicate_conflicts_get_rerun_advice() {
        let duplicate =
            persistence_help(persistence_failure(StoreError::duplicate("raw_codes", "*1;a")));
        assert!(duplicate.downcast_ref::<HelpfulError>().is_some());

        let id_clash = persistence_help(persistence_failure(StoreError::IdConflict {
            collection: "raw_codes".to_string(),
            id: "01J0000000000000000000000A".to_string(),
        }));
        assert!(id_clash.downcast_ref::<HelpfulError>().is_none());
        assert!(format!("{:#}", id_clash).contains("Record id already stored"));
    }

    #[test]
    fn test_missing_file_is_helpful() {
        let args = IngestArgs {
            codes: Vec::new(),
            file: Some(PathBuf::from("/does/not/exist.txt")),
            yes: true,
            dry_run: false,
            json: false,
        };
        let err = collect_codes(&args).unwrap_err();
        assert!(err.downcast_ref::<HelpfulError>().is_some());
    }
}
