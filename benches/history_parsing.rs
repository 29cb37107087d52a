use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use shell_history_ingest::models::ShellType;
use shell_history_ingest::parsers::{DialectParser, parser_for};
use shell_history_ingest::utils::CancelToken;

/// Generate a synthetic history in the given dialect with N commands
fn generate_history(shell: ShellType, num_entries: usize) -> Vec<u8> {
    let mut content = String::new();

    if shell == ShellType::PowerShell {
        content.push_str("[\n");
    }

    for i in 0..num_entries {
        let ts = 1_700_000_000 + i as i64;
        let command = format!("cargo test --package crate{} -- --nocapture", i % 500);
        let record = match shell {
            ShellType::Bash => format!("#{}\n{}\n", ts, command),
            ShellType::Zsh => format!(": {}:0;{}\n", ts, command),
            ShellType::Fish => format!("- cmd: {}\n  when: {}\n", command, ts),
            ShellType::PowerShell => format!(
                "  {{\n    \"Id\": {},\n    \"CommandLine\": \"{}\",\n    \"StartExecutionTime\": \"\\/Date({}000)\\/\"\n  }},\n",
                i, command, ts
            ),
            ShellType::Unknown => format!("{}\n", command),
        };
        content.push_str(&record);
    }

    if shell == ShellType::PowerShell {
        content.push_str("]\n");
    }

    content.into_bytes()
}

fn bench_parse_dialects(c: &mut Criterion) {
    for shell in ShellType::DETECTABLE {
        let mut group = c.benchmark_group(format!("parse_{}", shell));
        let parser = parser_for(shell);
        let cancel = CancelToken::new();

        for size in [100, 1_000, 10_000, 50_000].iter() {
            let content = generate_history(shell, *size);

            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
                b.iter(|| {
                    let mut reader = Cursor::new(black_box(content.as_slice()));
                    parser.parse(&mut reader, &cancel).unwrap()
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench_parse_dialects);
criterion_main!(benches);
