use criterion::{criterion_group, criterion_main, Criterion};
use gcom::core::{discover, find_candidates, DiscoveryMode};
use gcom::git::{parse_log_output, GitRunner, SystemGit};
use std::fs;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

fn setup_many_repos(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for i in 0..count {
        // Spread repositories over a few levels so recursive discovery has work to do
        let repo_path = root.join(format!("group-{}/team-{}/repo-{}", i % 5, i % 3, i));
        fs::create_dir_all(&repo_path).unwrap();
        Command::new("git")
            .arg("init")
            .arg("-q")
            .current_dir(&repo_path)
            .output()
            .unwrap();
    }

    temp_dir
}

fn sample_log(records: usize) -> String {
    (0..records)
        .map(|i| {
            format!(
                "{:040x}\0Grace Hopper\0{}\0Refactor module number {i}\n",
                i,
                1_700_000_000 + i
            )
        })
        .collect()
}

fn bench_parse_log(c: &mut Criterion) {
    let output = sample_log(5_000);

    c.bench_function("parse_log_5000_records", |b| b.iter(|| parse_log_output(&output)));
}

fn bench_find_candidates(c: &mut Criterion) {
    let temp_dir = setup_many_repos(100);
    let path = temp_dir.path().to_path_buf();

    c.bench_function("find_candidates_recursive_100_repos", |b| {
        b.iter(|| find_candidates(&path, DiscoveryMode::Recursive { max_depth: 10 }))
    });
}

fn bench_discover(c: &mut Criterion) {
    let temp_dir = setup_many_repos(100);
    let path = temp_dir.path().to_path_buf();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let runner: Arc<dyn GitRunner> = Arc::new(SystemGit::default());

    c.bench_function("discover_confirmed_100_repos", |b| {
        b.to_async(&runtime).iter(|| {
            discover(
                &path,
                DiscoveryMode::Recursive { max_depth: 10 },
                Arc::clone(&runner),
            )
        })
    });
}

criterion_group!(benches, bench_parse_log, bench_find_candidates, bench_discover);
criterion_main!(benches);
