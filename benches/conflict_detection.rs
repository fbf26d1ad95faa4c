use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rail_scheduler::conflict::detect_conflicts;
use rail_scheduler::models::{Station, StationId, Track, TrackId, Train, TrainId};
use rail_scheduler::network::NetworkStore;
use rail_scheduler::{Scheduler, SchedulerConfig};

const TRACKS: u32 = 40;
const TRAINS_PER_TRACK: u32 = 12;

fn tracks() -> Vec<Track> {
    (0..TRACKS)
        .map(|i| {
            let stations = vec![StationId(i), StationId(i + 1)];
            if i % 3 == 0 {
                Track::new_single_track(TrackId(i), 40.0, 4).with_stations(stations)
            } else {
                Track::new_multi_track(TrackId(i), 120.0, 8).with_stations(stations)
            }
        })
        .collect()
}

fn stations() -> Vec<Station> {
    (0..=TRACKS)
        .map(|i| Station::new(StationId(i), format!("Station {i}"), 4))
        .collect()
}

fn trains() -> Vec<Train> {
    (0..TRACKS)
        .flat_map(|track| {
            (0..TRAINS_PER_TRACK).map(move |n| {
                let id = track * TRAINS_PER_TRACK + n;
                let priority = u8::try_from(id % 10 + 1).unwrap_or(5);
                Train::new(TrainId(id), TrackId(track), f64::from(n) * 3.1, 80.0 + f64::from(n % 4) * 20.0)
                    .with_priority(priority)
                    .with_destination(StationId(track + 1))
            })
        })
        .collect()
}

fn network() -> NetworkStore {
    let mut store = NetworkStore::new();
    store.initialize_network(tracks(), stations());
    for train in trains() {
        store.add_train(train);
    }
    store
}

fn benchmark_conflict_detection(c: &mut Criterion) {
    let store = network();

    c.bench_function("conflict_detection", |b| {
        b.iter(|| detect_conflicts(black_box(&store)));
    });

    // Planning clones the network, so every iteration starts from the same state
    let mut scheduler = Scheduler::new(SchedulerConfig::default());
    scheduler.initialize_network(tracks(), stations());
    for train in trains() {
        scheduler.add_train(train);
    }

    c.bench_function("plan_optimization", |b| {
        b.iter(|| scheduler.plan_optimization(black_box(10)));
    });
}

criterion_group!(benches, benchmark_conflict_detection);
criterion_main!(benches);
