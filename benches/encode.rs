//! Input encoding benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mochi_input::core::{ModeFlags, MouseEncoding, MouseMode, Position, TextRange};
use mochi_input::input::{encode_mouse, ControlLatch, MouseButton, MouseEventType};
use mochi_input::{CompositionTracker, Key, KeyEncoder, Modifiers};

fn bench_key_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("keys");

    let encoder = KeyEncoder::default();
    let normal = ModeFlags::default();
    let application = ModeFlags {
        application_cursor: true,
        ..ModeFlags::default()
    };

    // Typical interactive mix: cursor keys, editing keys and characters
    let keys: Vec<Key> = "git status"
        .chars()
        .map(Key::Char)
        .chain([Key::Enter, Key::Up, Key::Down, Key::Backspace, Key::Tab, Key::Function(5)])
        .collect();
    group.throughput(Throughput::Elements(keys.len() as u64));

    group.bench_function("normal_mode", |b| {
        b.iter(|| {
            let mut latch = ControlLatch::new();
            for &key in &keys {
                black_box(encoder.encode(black_box(key), Modifiers::default(), &normal, &mut latch));
            }
        })
    });

    group.bench_function("application_mode", |b| {
        b.iter(|| {
            let mut latch = ControlLatch::new();
            for &key in &keys {
                black_box(encoder.encode(black_box(key), Modifiers::default(), &application, &mut latch));
            }
        })
    });

    group.finish();
}

fn bench_mouse_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("mouse");

    for encoding in [MouseEncoding::X10, MouseEncoding::Sgr, MouseEncoding::Utf8, MouseEncoding::Urxvt] {
        let modes = ModeFlags {
            mouse_mode: MouseMode::AnyMotion,
            mouse_encoding: encoding,
            ..ModeFlags::with_size(300, 100)
        };
        group.bench_function(format!("{:?}", encoding), |b| {
            b.iter(|| {
                for col in (0..300).step_by(7) {
                    black_box(encode_mouse(
                        MouseButton::Left,
                        MouseEventType::Drag,
                        black_box(Position::new(col, 42)),
                        Modifiers::default(),
                        &modes,
                    ));
                }
            })
        });
    }

    group.finish();
}

fn bench_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("composition");

    group.bench_function("compose_and_commit", |b| {
        b.iter(|| {
            let mut tracker = CompositionTracker::new();
            let mut latch = ControlLatch::new();
            for text in ["n", "ni", "に", "にほ", "にほn", "にほん", "日本"] {
                let len = text.chars().count();
                tracker.set_marked_text(black_box(text), TextRange::caret(len));
            }
            black_box(tracker.unmark_text(&mut latch))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_key_encoding, bench_mouse_encoding, bench_composition);
criterion_main!(benches);
