use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sol64_codec::AppDataReader;
use sol64_erasure::{encode, multiply_add_region, multiply_region};
use sol64_field::memio::write_u64_le;
use sol64_field::Random;

const SIZES: [usize; 5] = [10, 100, 1000, 10_000, 100_000];
const ROWS: [usize; 3] = [2, 16, 128];

fn random_buffer(len: usize, prng: &mut Random) -> Vec<u8> {
    // Pad to whole words, then truncate; a few percent all-ones words keep
    // the overflow path in the measurement.
    let mut buf = vec![0u8; (len + 7) & !7];
    for k in (0..buf.len()).step_by(8) {
        let w = if prng.next() % 100 <= 3 {
            u64::MAX
        } else {
            prng.next()
        };
        write_u64_le(&mut buf[k..], w);
    }
    buf.truncate(len);
    buf
}

fn bench_regions(c: &mut Criterion) {
    let mut prng = Random::new(0);
    let mut group = c.benchmark_group("region");

    for &size in &SIZES {
        let data = random_buffer(size, &mut prng);
        let coeff = prng.next_nonzero_fp();
        let mut workspace = vec![0u8; AppDataReader::workspace_bytes(size)];
        let mut output = vec![0u8; AppDataReader::max_output_bytes(size)];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("multiply", size), &size, |b, _| {
            b.iter(|| multiply_region(&data, coeff, &mut workspace, &mut output));
        });
        group.bench_with_input(BenchmarkId::new("multiply_add", size), &size, |b, _| {
            b.iter(|| multiply_add_region(&data, coeff, &mut workspace, &mut output));
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut prng = Random::new(1);
    let mut group = c.benchmark_group("encode");

    let size = 100_000usize;
    for &n in &ROWS {
        let storage: Vec<Vec<u8>> = (0..n).map(|_| random_buffer(size, &mut prng)).collect();
        let rows: Vec<&[u8]> = storage.iter().map(|r| r.as_slice()).collect();
        let mut workspace = vec![0u8; AppDataReader::workspace_bytes(size)];
        let mut recovery = vec![0u8; AppDataReader::max_output_bytes(size)];

        group.throughput(Throughput::Bytes((size * n) as u64));
        group.bench_with_input(BenchmarkId::new("rows", n), &n, |b, _| {
            b.iter(|| encode(&rows, 7, &mut workspace, &mut recovery).unwrap());
        });
    }
    group.finish();
}

criterion_group!(erasure_benches, bench_regions, bench_encode);
criterion_main!(erasure_benches);
