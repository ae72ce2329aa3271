//! Performance benchmarks for filecopy
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filecopy::config::{CloneMode, CopyOptions};
use filecopy::fs::FileCopier;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

/// Create a test file of the specified size
fn create_test_file(dir: &std::path::Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();

    let chunk_size = 64 * 1024;
    let chunk: Vec<u8> = (0..chunk_size).map(|i| (i % 256) as u8).collect();
    let mut remaining = size;

    while remaining > 0 {
        let to_write = remaining.min(chunk_size);
        file.write_all(&chunk[..to_write]).unwrap();
        remaining -= to_write;
    }

    path
}

fn bench_copy_small_files(c: &mut Criterion) {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();

    let sources: Vec<_> = (0..100)
        .map(|i| create_test_file(src_dir.path(), &format!("file_{}.txt", i), 1024))
        .collect();

    c.bench_function("copy_100_small_files", |b| {
        b.iter(|| {
            for src in &sources {
                let _ = black_box(filecopy::copy(src, dst_dir.path(), true));
            }
        });
    });
}

fn bench_copy_large_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_file_copy");

    for size in [1024 * 1024, 10 * 1024 * 1024, 100 * 1024 * 1024].iter() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();

        let src_file = create_test_file(src_dir.path(), "large.bin", *size);
        let label = humansize::format_size(*size as u64, humansize::BINARY);

        group.throughput(Throughput::Bytes(*size as u64));

        for (name, clone) in [("auto", CloneMode::Auto), ("bytes", CloneMode::Never)] {
            group.bench_with_input(BenchmarkId::new(name, &label), size, |b, _| {
                let dst_file = dst_dir.path().join("large.bin");
                let copier = FileCopier::new(CopyOptions {
                    clone,
                    ..Default::default()
                });

                b.iter(|| {
                    let _ = black_box(copier.copy_file(&src_file, &dst_file));
                    let _ = std::fs::remove_file(&dst_file);
                });
            });
        }
    }

    group.finish();
}

fn bench_buffer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_sizes");

    let size = 10 * 1024 * 1024; // 10 MB
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let src_file = create_test_file(src_dir.path(), "data.bin", size);

    group.throughput(Throughput::Bytes(size as u64));

    for buffer_size in [8 * 1024, 64 * 1024, 1024 * 1024, 4 * 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::new("byte_copy", humansize::format_size(buffer_size as u64, humansize::BINARY)),
            &buffer_size,
            |b, &buffer_size| {
                let dst_file = dst_dir.path().join("data.bin");
                let copier = FileCopier::new(CopyOptions {
                    clone: CloneMode::Never,
                    buffer_size,
                    ..Default::default()
                });

                b.iter(|| black_box(copier.copy_file(&src_file, &dst_file)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_copy_small_files,
    bench_copy_large_file,
    bench_buffer_sizes
);

criterion_main!(benches);
