use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use codec::{decode_ghost, encode_ghost, Character, CodecLimits, Ghost, Huffman, WireLimits};

fn sample_ghost(ticks: i32) -> Ghost {
    let mut ghost = Ghost::new();
    ghost.set_metadata("bench", "Kobra 4", ticks * 20);
    ghost.set_skin("bluekitty", true, 0x00ff_a0c0, 0x0020_4080);
    for tick in 1..=ticks {
        let snapshot = Character {
            x: 1024 + tick * 7,
            y: 2048 - (tick % 300),
            vel_x: 256,
            vel_y: -(tick % 64),
            angle: (tick * 3) % 628,
            direction: 1,
            weapon: 1,
            hook_state: i32::from(tick % 40 > 30),
            hook_x: 1500,
            hook_y: 1800,
            attack_tick: tick - tick % 25,
            tick,
        };
        ghost.push_snapshot(snapshot).unwrap();
    }
    ghost
}

fn bench_ghost(c: &mut Criterion) {
    let limits = WireLimits::default();
    let ghost = sample_ghost(3000);
    let bytes = encode_ghost(&ghost, Vec::new(), &limits).unwrap();

    let mut group = c.benchmark_group("ghost");
    group.throughput(Throughput::Elements(3000));
    group.bench_function("encode_3000_ticks", |b| {
        b.iter(|| encode_ghost(black_box(&ghost), Vec::new(), &limits).unwrap());
    });
    group.bench_function("decode_3000_ticks", |b| {
        b.iter(|| decode_ghost(black_box(&bytes), &limits, &CodecLimits::default()).unwrap());
    });
    group.finish();
}

fn bench_huffman(c: &mut Criterion) {
    let huffman = Huffman::new();
    let input: Vec<u8> = (0..6400u32).map(|i| (i % 7) as u8).collect();
    let mut compressed = vec![0u8; 12_800];
    let len = huffman.compress(&input, &mut compressed).unwrap();
    let mut decompressed = vec![0u8; 25_600];

    let mut group = c.benchmark_group("huffman");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("compress_6400", |b| {
        b.iter(|| huffman.compress(black_box(&input), &mut compressed).unwrap());
    });
    group.bench_function("decompress_6400", |b| {
        b.iter(|| {
            huffman
                .decompress(black_box(&compressed[..len]), &mut decompressed)
                .unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_ghost, bench_huffman);
criterion_main!(benches);
