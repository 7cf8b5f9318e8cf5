use async_trait::async_trait;
use slot_seeder::app::ports::{FetchResult, SourcePort};
use slot_seeder::infra::FileSource;
use slot_seeder::pipeline::{
    BatchSeparator, ConflictPolicy, EmitterConfig, FieldSelector, RenderOptions,
};
use slot_seeder::types::StatementKind;
use slot_seeder::{PipelineConfig, SeedPipeline, SeederError};
use std::io::Write;

/// Serves a canned response regardless of location
struct MockSource {
    status: u16,
    body: String,
}

impl MockSource {
    fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl SourcePort for MockSource {
    async fn fetch(&self, _location: &str) -> slot_seeder::Result<FetchResult> {
        Ok(FetchResult {
            status: self.status,
            bytes: self.body.as_bytes().to_vec(),
        })
    }
}

struct DownSource;

#[async_trait]
impl SourcePort for DownSource {
    async fn fetch(&self, location: &str) -> slot_seeder::Result<FetchResult> {
        Err(SeederError::SourceUnavailable(format!("connection refused: {location}")))
    }
}

fn export_with(rows: usize) -> String {
    let mut csv = String::from("Game,Provider\n");
    for i in 0..rows {
        csv.push_str(&format!("Slot {i},Provider {}\n", i % 7));
    }
    csv
}

fn pipeline_with(batch_size: usize) -> SeedPipeline {
    SeedPipeline::new(PipelineConfig {
        emitter: EmitterConfig {
            batch_size,
            ..EmitterConfig::default()
        },
        ..PipelineConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_quotes_escaped_and_blank_rows_dropped() {
    let source = MockSource::ok("Game,Provider\n7 Sins,Play'n GO\n,x\nBook of Ra,Novomatic\n");
    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();

    let output = pipeline.run_source(&source, "mock://slots.csv").await.unwrap();

    assert_eq!(output.statements.len(), 1);
    assert_eq!(
        output.statements[0].as_str(),
        "INSERT INTO slots (game_name, provider) VALUES\n  ('7 Sins', 'Play''n GO'),\n  ('Book of Ra', 'Novomatic');"
    );
    assert_eq!(output.stats.skipped, 1);
}

#[tokio::test]
async fn test_hundred_twenty_rows_make_three_batches() {
    let source = MockSource::ok(&export_with(120));
    let output = pipeline_with(50).run_source(&source, "mock://slots.csv").await.unwrap();

    let counts: Vec<usize> = output.statements.iter().map(|s| s.row_count()).collect();
    assert_eq!(counts, vec![50, 50, 20]);
    assert_eq!(output.stats.insert_statements, 3);
}

#[test]
fn test_statement_count_is_ceiling_of_records_over_batch_size() {
    for (records, batch_size) in [(1, 1), (7, 3), (9, 3), (49, 50), (51, 50), (0, 4)] {
        let output = pipeline_with(batch_size).run_bytes(export_with(records).as_bytes()).unwrap();
        let counts: Vec<usize> = output.statements.iter().map(|s| s.row_count()).collect();

        assert_eq!(counts.len(), records.div_ceil(batch_size), "{records}/{batch_size}");
        assert_eq!(counts.iter().sum::<usize>(), records);
        assert!(counts.iter().all(|&c| (1..=batch_size).contains(&c)));
        if let Some(&last) = counts.last() {
            let expected = if records % batch_size == 0 { batch_size } else { records % batch_size };
            assert_eq!(last, expected);
        }
    }
}

#[test]
fn test_zero_batch_size_is_rejected_up_front() {
    let result = SeedPipeline::new(PipelineConfig {
        emitter: EmitterConfig {
            batch_size: 0,
            ..EmitterConfig::default()
        },
        ..PipelineConfig::default()
    });
    assert!(matches!(result, Err(SeederError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn test_non_success_status_is_source_unavailable() {
    let source = MockSource {
        status: 404,
        body: "Not Found".to_string(),
    };
    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();

    let result = pipeline.run_source(&source, "mock://missing.csv").await;
    assert!(matches!(result, Err(SeederError::SourceUnavailable(_))));
}

#[tokio::test]
async fn test_transport_failure_is_source_unavailable() {
    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();
    let result = pipeline.run_source(&DownSource, "https://unreachable.invalid/x.csv").await;
    assert!(matches!(result, Err(SeederError::SourceUnavailable(_))));
}

#[test]
fn test_input_without_header_is_malformed() {
    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();
    assert!(matches!(pipeline.run_bytes(b""), Err(SeederError::MalformedInput(_))));
    assert!(matches!(pipeline.run_bytes(b"\n\n"), Err(SeederError::MalformedInput(_))));
}

#[test]
fn test_stray_latin1_byte_does_not_abort_run() {
    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline
        .run_bytes(b"Game,Provider\nBook of Ra,Novomatic\nPok\xe9mon Slots,Acme\nStarburst,NetEnt\n")
        .unwrap();

    assert_eq!(output.stats.records, 3);
    let sql = output.statements[0].as_str();
    assert!(sql.contains("('Book of Ra', 'Novomatic')"));
    assert!(sql.contains("('Pok\u{fffd}mon Slots', 'Acme')"));
    assert!(sql.ends_with("('Starburst', 'NetEnt');"));
}

#[test]
fn test_quote_count_doubles() {
    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline
        .run_bytes("Game,Provider\nO'Reilly's 'Gold',NoQuotes\n".as_bytes())
        .unwrap();
    let sql = output.statements[0].as_str();

    assert!(sql.contains("('O''Reilly''s ''Gold''', 'NoQuotes')"));
    let value_quotes = "O''Reilly''s ''Gold''".matches('\'').count();
    assert_eq!(value_quotes, 2 * "O'Reilly's 'Gold'".matches('\'').count());
}

#[test]
fn test_rerun_is_byte_identical() {
    let pipeline = SeedPipeline::new(PipelineConfig {
        emitter: EmitterConfig {
            batch_size: 3,
            pre_clear: true,
            conflict_policy: ConflictPolicy::DoNothing,
            ..EmitterConfig::default()
        },
        ..PipelineConfig::default()
    })
    .unwrap();
    let options = RenderOptions {
        separator: BatchSeparator::Comment,
        annotate: true,
    };
    let csv = export_with(10);

    let first = pipeline.run_bytes(csv.as_bytes()).unwrap().render(&options);
    let second = pipeline.run_bytes(csv.as_bytes()).unwrap().render(&options);
    assert_eq!(first, second);
}

#[test]
fn test_full_replace_script() {
    let pipeline = SeedPipeline::new(PipelineConfig {
        fields: FieldSelector::by_header("Provider", "Game"),
        emitter: EmitterConfig {
            pre_clear: true,
            conflict_policy: ConflictPolicy::DoNothingOn(vec!["game_name".into(), "provider".into()]),
            ..EmitterConfig::default()
        },
    })
    .unwrap();

    let output = pipeline
        .run_bytes(b"Game,Provider\nNovomatic,Book of Ra\n")
        .unwrap();

    assert_eq!(output.statements[0].kind(), StatementKind::Clear);
    assert_eq!(
        output.render(&RenderOptions::default()),
        "DELETE FROM slots;\n\n\
         INSERT INTO slots (game_name, provider) VALUES\n  ('Book of Ra', 'Novomatic') ON CONFLICT (game_name, provider) DO NOTHING;\n"
    );
}

#[tokio::test]
async fn test_file_source_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "\u{feff}Game,Provider\r\nGonzo's Quest,NetEnt\r\n  Dead or Alive 2 , NetEnt \r\n").unwrap();

    let pipeline = SeedPipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline
        .run_source(&FileSource, file.path().to_str().unwrap())
        .await
        .unwrap();

    assert_eq!(output.stats.records, 2);
    assert!(output.statements[0]
        .as_str()
        .ends_with("  ('Gonzo''s Quest', 'NetEnt'),\n  ('Dead or Alive 2', 'NetEnt');"));
}
