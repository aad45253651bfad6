use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use itest_runner::classifier::classify;
use itest_runner::command::CommandLine;
use itest_runner::core::models::RunContext;
use itest_runner::infra::command::{CommandRunner, PosixShell};
use tokio::runtime::Runtime;

fn sample_log(cases: usize) -> String {
    let mut log = String::new();
    for i in 0..cases {
        log.push_str(&format!("Running project://suite/case{}.xml\n", i));
        log.push_str("  step 1 ... ok\n  step 2 ... ok\n");
        log.push_str("Execution status:  Pass\n");
    }
    log
}

fn bench_classify(c: &mut Criterion) {
    let clean = sample_log(5_000);
    let mut failing = sample_log(5_000);
    failing.push_str("Execution status:  Fail\n");

    c.bench_function("classify_clean_log", |b| b.iter(|| classify(black_box(&clean))));
    c.bench_function("classify_failing_log", |b| b.iter(|| classify(black_box(&failing))));
}

fn bench_posix_shell(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let ctx = RunContext::new(dir.path().to_path_buf(), "bench", dir.path().join("bench.log"));
    let mut command = CommandLine::new("echo");
    command.push("--test", "project://suite/case1.xml");

    c.bench_function("posix_shell_echo", |b| {
        b.to_async(&rt).iter(|| async {
            let _ = PosixShell.run(&command, &ctx).await;
        });
    });
}

criterion_group!(benches, bench_classify, bench_posix_shell);
criterion_main!(benches);
