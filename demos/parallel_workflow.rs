use papi_observer::{AggregateRegistry, Config, Papi, Report};

fn main() -> papi_observer::Result<()> {
    env_logger::init();

    let threads = 4;
    let papi = Papi::init()?;
    let mut registry = AggregateRegistry::from_preset(&papi, &Config::default(), "cache_and_idle")?;

    for phase in 0..2 {
        registry.create_thread_group(threads)?;

        let registry_ref = &registry;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("Failed to build thread pool");
        let outcomes: Vec<papi_observer::Result<()>> = pool.install(|| {
            use rayon::prelude::*;

            (0..threads)
                .into_par_iter()
                .map(|tid| {
                    registry_ref.start(tid)?;
                    work(phase, tid);
                    registry_ref.stop(tid)
                })
                .collect()
        });
        outcomes.into_iter().collect::<papi_observer::Result<()>>()?;

        println!("After phase {}:", phase);
        print!("{}", Report::from_registry(&registry)?.with_ratios());
    }

    Ok(())
}

fn work(phase: usize, tid: usize) {
    let data: Vec<u64> = (0..1 << 16).map(|x| x * (tid as u64 + 1)).collect();
    let collected: u64 = data.iter().step_by(phase + 1).sum();

    println!("Thread {} summed up {}", tid, collected);
}
