use bgeval::board::Board;
use bgeval::encode;
use bgeval::escape;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        classifying_starting_position,
        encoding_contact_inputs,
        encoding_race_inputs,
        escape_table_lookup,
}

fn classifying_starting_position(c: &mut criterion::Criterion) {
    let board = Board::standard_starting();
    c.bench_function("classify the starting position", |b| {
        b.iter(|| board.classify())
    });
}

fn encoding_contact_inputs(c: &mut criterion::Criterion) {
    let board = Board::standard_starting();
    c.bench_function("encode the 250-wide contact input vector", |b| {
        b.iter(|| encode::encode_contact(&board))
    });
}

fn encoding_race_inputs(c: &mut criterion::Criterion) {
    let board = Board::standard_starting();
    c.bench_function("encode the 214-wide race input vector", |b| {
        b.iter(|| encode::encode_race(&board))
    });
}

fn escape_table_lookup(c: &mut criterion::Criterion) {
    let board = Board::standard_starting();
    c.bench_function("look up escape counts from a built table", |b| {
        b.iter(|| escape::escapes(board.side(0), 8))
    });
}
