use papi_observer::backend::synthetic::SyntheticBackend;
use papi_observer::event::{Event, CACHE_AND_IDLE};
use papi_observer::{AggregateRegistry, Config, ErrorKind, Report, SessionOptions};
use rayon::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn work(tid: usize) -> u64 {
    (0..1000 * (tid as u64 + 1)).filter(|x| x % 3 == 0).sum()
}

#[test]
fn rayon_scope_sums_every_worker() {
    init_logging();

    let threads = 8;
    let backend = SyntheticBackend::new()
        .with_count(Event::L3_TCA, 400)
        .with_count(Event::L3_TCM, 100)
        .with_default_count(25);
    let mut registry =
        AggregateRegistry::new(&backend, &CACHE_AND_IDLE, SessionOptions::default()).unwrap();
    registry.create_thread_group(threads).unwrap();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap();
    let registry_ref = &registry;
    pool.scope(|s| {
        for tid in 0..threads {
            s.spawn(move |_| {
                registry_ref.start(tid).unwrap();
                work(tid);
                registry_ref.stop(tid).unwrap();
            });
        }
    });

    assert_eq!(registry.result(Event::L3_TCA).unwrap(), 8 * 400);
    assert_eq!(registry.result(Event::L3_TCM).unwrap(), 8 * 100);
    assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 8 * 25);
    assert!((0..threads).all(|tid| registry.is_finished(tid)));
    assert_eq!(backend.registered_threads(), threads);
    assert_eq!(backend.unregistered_threads(), threads);
    assert_eq!(backend.live_event_sets(), 0);

    let report = Report::from_registry(&registry).unwrap().with_ratios();
    let printed = report.to_string();
    assert!(printed.contains("L3 miss/access ratio: 0.25\n"));
    assert!(printed.ends_with("@%@ 3200 800 200 200 200\n"));
}

#[test]
fn successive_groups_accumulate() {
    init_logging();

    let backend = SyntheticBackend::new().with_count(Event::TOT_CYC, 5);
    let config = Config::parse_str(
        r#"
        [presets]
        Cycles = ["PAPI_TOT_CYC"]
        "#,
    )
    .unwrap();
    let mut registry = AggregateRegistry::from_preset(&backend, &config, "Cycles").unwrap();

    for (threads, expected) in [(2, 10), (1, 15), (3, 30)].iter() {
        registry.create_thread_group(*threads).unwrap();
        let registry_ref = &registry;
        (0..*threads).into_par_iter().for_each(|tid| {
            registry_ref.start(tid).unwrap();
            registry_ref.stop(tid).unwrap();
        });
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), *expected);
    }

    registry.reset().unwrap();
    assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 0);
}

#[test]
fn finished_workers_must_wait_for_next_group() {
    init_logging();

    let backend = SyntheticBackend::new();
    let mut registry =
        AggregateRegistry::from_preset(&backend, &Config::default(), "cache_and_idle").unwrap();
    registry.create_thread_group(4).unwrap();

    let registry_ref = &registry;
    let restarts: Vec<bool> = (0..4)
        .into_par_iter()
        .map(|tid| {
            registry_ref.start(tid).unwrap();
            registry_ref.stop(tid).unwrap();
            match registry_ref.start(tid) {
                Err(e) => match e.kind() {
                    ErrorKind::GroupExhausted(t) => *t == tid,
                    _ => false,
                },
                Ok(()) => false,
            }
        })
        .collect();

    assert_eq!(restarts, vec![true; 4]);
}
