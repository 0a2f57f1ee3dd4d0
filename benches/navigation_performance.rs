use criterion::{Criterion, black_box, criterion_group, criterion_main};
use homebound::{
    Coordinate, NavigationState, Navigator, RouteOutcome, RouteUpdate, ZoomLevel,
    directions::decode_route, format_eta,
};
use std::{sync::mpsc, time::Duration};

fn create_directions_response(points: usize, steps: usize) -> String {
    let coordinates = (0..points)
        .map(|idx| format!("[{},{}]", 74.30 + idx as f64 * 0.0001, 31.48 + idx as f64 * 0.0001))
        .collect::<Vec<_>>()
        .join(",");
    let steps = (0..steps)
        .map(|idx| format!(r#"{{"maneuver":{{"instruction":"Step {} of the route."}}}}"#, idx))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"routes":[{{"geometry":{{"coordinates":[{}]}},"duration":1834.6,"legs":[{{"steps":[{}]}}]}}]}}"#,
        coordinates, steps
    )
}

fn bench_decode_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("directions");
    group.measurement_time(Duration::from_secs(5));

    let short = create_directions_response(50, 5);
    let long = create_directions_response(5000, 120);

    group.bench_function("decode_short_route", |b| {
        b.iter(|| decode_route(black_box(&short)))
    });
    group.bench_function("decode_long_route", |b| {
        b.iter(|| decode_route(black_box(&long)))
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let (request_tx, _request_rx) = mpsc::channel();
    let mut navigator = Navigator::new(
        NavigationState::new(Coordinate::new(31.4984, 74.3231), ZoomLevel::default()),
        request_tx,
        None,
    );
    if let Ok(Some(route)) = decode_route(&create_directions_response(5000, 120)) {
        navigator.handle_event(
            RouteUpdate {
                seq: 1,
                outcome: RouteOutcome::Found(route),
            }
            .into(),
        );
    }

    group.bench_function("render_state", |b| b.iter(|| black_box(&navigator).render()));
    group.bench_function("format_eta", |b| b.iter(|| format_eta(black_box(1834.6))));

    group.finish();
}

criterion_group!(benches, bench_decode_route, bench_render);
criterion_main!(benches);
