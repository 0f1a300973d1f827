use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use segy_rs::{
    ByteOrder, Configuration, FieldType, Settings, TextEncoding, encode_text, prepare, write_field,
};

const STOP: &str = "((SEG: EndText))";

/// Header-only file with `extended` extended text headers, the last one
/// carrying the stop stanza.
fn make_file(order: ByteOrder, encoding: TextEncoding, extended: usize) -> Vec<u8> {
    let space = encode_text(" ", encoding).unwrap()[0];
    let mut data = vec![space; 3600 + extended * 3200];
    let card = encode_text("C 1 CLIENT", encoding).unwrap();
    data[..card.len()].copy_from_slice(&card);
    if extended > 0 {
        let stop = encode_text(STOP, encoding).unwrap();
        let last = 3600 + (extended - 1) * 3200;
        data[last + 3000..last + 3000 + stop.len()].copy_from_slice(&stop);
    }

    let indicator = if extended > 0 { -1 } else { 0 };
    let mut cur = Cursor::new(data);
    write_field(&mut cur, FieldType::Short, 3220, 1500, order).unwrap();
    write_field(&mut cur, FieldType::Short, 3224, 1, order).unwrap();
    write_field(&mut cur, FieldType::Short, 3504, indicator, order).unwrap();
    cur.into_inner()
}

fn bench_prepare(c: &mut Criterion) {
    let big_ebcdic = make_file(ByteOrder::Big, TextEncoding::Ebcdic, 0);
    let little_ascii = make_file(ByteOrder::Little, TextEncoding::Ascii, 0);

    let mut group = c.benchmark_group("prepare");

    group.bench_function("big/ebcdic", |b| {
        b.iter(|| {
            let mut config = Configuration::new();
            prepare(&mut Cursor::new(black_box(&big_ebcdic)), &mut config).unwrap()
        })
    });
    group.bench_function("little/ascii", |b| {
        b.iter(|| {
            let mut config = Configuration::new();
            prepare(&mut Cursor::new(black_box(&little_ascii)), &mut config).unwrap()
        })
    });

    group.finish();
}

fn bench_extended_scan(c: &mut Criterion) {
    let mut settings = Settings::default();
    settings.extended_header_stop_marker = Some(STOP.into());
    let template = Configuration::try_from(&settings).unwrap();

    let mut group = c.benchmark_group("extended_scan");

    for blocks in [1usize, 8, 32] {
        let file = make_file(ByteOrder::Big, TextEncoding::Ebcdic, blocks);
        group.bench_function(format!("{blocks}blocks"), |b| {
            b.iter(|| {
                let mut config = template.clone();
                let prepared = prepare(&mut Cursor::new(black_box(&file)), &mut config).unwrap();
                assert_eq!(prepared.extra_text_header_number, blocks as i64);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_prepare, bench_extended_scan);
criterion_main!(benches);
